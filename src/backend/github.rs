use reqwest::Client;
use tracing::debug;
use crate::config::AppConfig;
use crate::errors::AgunblockError;
use crate::models::GitHubRepo;
use super::http::ensure_success;

/// Unauthenticated, read-only access to GitHub's public REST API.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Result<Self, AgunblockError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AgunblockError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.github_api_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn repository(&self, owner: &str, repo: &str) -> Result<GitHubRepo, AgunblockError> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
        debug!(%url, "Fetching GitHub repository");

        let resp = self.client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AgunblockError::Network(format!("GitHub request failed: {}", e)))?;

        let resp = ensure_success(resp).await?;
        resp.json().await
            .map_err(|e| AgunblockError::Stream(format!("Invalid GitHub response: {}", e)))
    }

    pub async fn stars(&self, owner: &str, repo: &str) -> Result<u64, AgunblockError> {
        Ok(self.repository(owner, repo).await?.stargazers_count)
    }
}
