pub mod agents;
pub mod backend;
pub mod cli;
pub mod config;
pub mod errors;
pub mod markdown;
pub mod models;
pub mod session;
pub mod stream;
pub mod utils;
pub mod view;
