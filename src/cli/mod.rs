pub mod commands;
pub mod analyze;
pub mod info;
pub mod stars;
pub mod agents;
pub mod render;

pub use commands::{Cli, Commands, GlobalOpts};

use std::path::Path;
use crate::config::{load_config, AppConfig};
use crate::errors::AgunblockError;
use crate::models::RepoSlug;

pub(crate) async fn load(opts: &GlobalOpts) -> Result<AppConfig, AgunblockError> {
    load_config(opts.config.as_deref().map(Path::new), opts.api_url.as_deref()).await
}

pub(crate) fn parse_repository(input: &str) -> Result<RepoSlug, AgunblockError> {
    RepoSlug::parse(input).ok_or_else(|| {
        AgunblockError::InvalidInput(format!(
            "Expected owner/repo or a GitHub URL, got '{}'",
            input
        ))
    })
}
