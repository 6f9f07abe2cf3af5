pub mod types;
pub mod classification;

pub use types::AgunblockError;
pub use classification::{ErrorClassification, ErrorKind};
