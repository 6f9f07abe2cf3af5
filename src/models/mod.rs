pub mod progress;
pub mod result;
pub mod repo;

pub use progress::*;
pub use result::*;
pub use repo::*;
