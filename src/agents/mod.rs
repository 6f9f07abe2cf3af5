pub mod catalog;

pub use catalog::{AgentCategory, AgentInfo, AGENTS};
