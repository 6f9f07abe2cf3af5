pub mod state;
pub mod controller;

pub use state::{AnalysisSession, Flow};
pub use controller::{validate_request, StreamingAnalysis};
