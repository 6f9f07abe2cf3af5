use std::path::Path;
use crate::errors::AgunblockError;
use super::types::{AppConfig, ConfigFile};
use tracing::debug;

/// Environment variables consulted for the backend URL, highest priority
/// first. `VITE_API_URL` is accepted so an existing frontend `.env` works.
pub const API_URL_VARS: &[&str] = &["AGUNBLOCK_API_URL", "VITE_API_URL"];
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<ConfigFile, AgunblockError> {
    if !path.exists() {
        return Err(AgunblockError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(AgunblockError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    let file: ConfigFile = serde_yaml::from_str(&content)?;
    Ok(file)
}

/// Resolve configuration: defaults, then the optional file, then the
/// environment, then an explicit `--api-url`.
pub async fn load_config(
    path: Option<&Path>,
    api_url_override: Option<&str>,
) -> Result<AppConfig, AgunblockError> {
    if let Ok(dotenv) = dotenvy::dotenv() {
        debug!(path = %dotenv.display(), "Loaded .env");
    }

    let mut config = AppConfig::default();
    if let Some(path) = path {
        config.merge_file(parse_config(path).await?);
    }
    apply_env(&mut config, |key| std::env::var(key).ok());
    if let Some(url) = api_url_override {
        config.api_url = url.to_string();
    }

    normalize(&mut config)?;
    debug!(api_url = %config.api_url, github_api_url = %config.github_api_url, "Configuration resolved");
    Ok(config)
}

pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = API_URL_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .find(|v| !v.trim().is_empty())
    {
        config.api_url = url;
    }
    if let Some(url) = lookup(GITHUB_API_URL_VAR).filter(|v| !v.trim().is_empty()) {
        config.github_api_url = url;
    }
}

/// Validate URLs and strip trailing slashes so paths can be appended.
pub fn normalize(config: &mut AppConfig) -> Result<(), AgunblockError> {
    config.api_url = normalize_url("api_url", &config.api_url)?;
    config.github_api_url = normalize_url("github_api_url", &config.github_api_url)?;
    if config.stream_timeout_secs == Some(0) {
        return Err(AgunblockError::Config("stream_timeout_secs must be greater than 0".into()));
    }
    Ok(())
}

fn normalize_url(field: &str, raw: &str) -> Result<String, AgunblockError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| AgunblockError::Config(format!("Invalid {} '{}': {}", field, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(AgunblockError::Config(format!(
            "Invalid {} '{}': unsupported scheme '{}'", field, raw, other
        ))),
    }
}
