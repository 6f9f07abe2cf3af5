pub mod progress;
pub mod renderer;
pub mod steps;

pub use progress::AnalysisProgress;
pub use steps::{project, step_status, StepStatus, StepView, ANALYSIS_STEPS};
