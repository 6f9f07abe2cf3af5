pub mod provider;
pub mod http;
pub mod github;

pub use provider::{AnalysisBackend, ByteStream};
pub use http::HttpBackend;
pub use github::GitHubClient;
