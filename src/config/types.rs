use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("agunblock/", env!("CARGO_PKG_VERSION"));

/// Shape of the optional YAML config file. Every field may be omitted.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub github_api_url: Option<String>,
    pub stream_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// Base URL of the analysis backend, without trailing slash.
    pub api_url: String,
    pub github_api_url: String,
    /// Abort a stalled analysis stream after this many seconds. `None`
    /// waits indefinitely.
    pub stream_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            stream_timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Overlay values present in a config file.
    pub fn merge_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.api_url {
            self.api_url = url;
        }
        if let Some(url) = file.github_api_url {
            self.github_api_url = url;
        }
        if file.stream_timeout_secs.is_some() {
            self.stream_timeout_secs = file.stream_timeout_secs;
        }
        if let Some(ua) = file.user_agent {
            self.user_agent = ua;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert!(config.stream_timeout_secs.is_none());
        assert!(config.user_agent.starts_with("agunblock/"));
    }

    #[test]
    fn test_merge_file_only_overrides_present_fields() {
        let mut config = AppConfig::default();
        config.merge_file(ConfigFile {
            api_url: Some("https://api.agunblock.com".into()),
            stream_timeout_secs: Some(90),
            ..Default::default()
        });
        assert_eq!(config.api_url, "https://api.agunblock.com");
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.stream_timeout_secs, Some(90));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let res: Result<ConfigFile, _> = serde_yaml::from_str("api_url: x\nbogus: 1\n");
        assert!(res.is_err());
    }
}
