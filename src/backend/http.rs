use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use crate::config::AppConfig;
use crate::errors::AgunblockError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, RepoInfo};
use super::provider::{AnalysisBackend, ByteStream};

/// The agunblock HTTP API.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self, AgunblockError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AgunblockError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn open_analysis_stream(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<ByteStream, AgunblockError> {
        let url = self.url("/api/analyze-stream");
        debug!(%url, agent_id = %request.agent_id, "Opening analysis stream");

        let resp = self.client
            .post(&url)
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| AgunblockError::Network(format!("Analysis request failed: {}", e)))?;

        let resp = ensure_success(resp).await?;
        let stream = resp.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| AgunblockError::Stream(format!("Failed to read analysis stream: {}", e)))
        });
        Ok(Box::pin(stream))
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AgunblockError> {
        let url = self.url("/api/analyze");
        debug!(%url, agent_id = %request.agent_id, "Requesting analysis");

        let resp = self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AgunblockError::Network(format!("Analysis request failed: {}", e)))?;

        let status = resp.status();
        let body = resp.text().await
            .map_err(|e| AgunblockError::Stream(format!("Failed to read analysis response: {}", e)))?;

        if !status.is_success() {
            // The backend reports its own failures as JSON; keep them as
            // backend errors rather than bare status codes.
            return match error_detail(&body) {
                Some(detail) => Ok(AnalyzeResponse { error: Some(detail), ..Default::default() }),
                None => Err(AgunblockError::Http { status: status.as_u16(), body }),
            };
        }

        serde_json::from_str(&body)
            .map_err(|e| AgunblockError::Stream(format!("Invalid analysis response: {}", e)))
    }

    async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, AgunblockError> {
        let url = self.url(&format!("/api/repo-info/{}/{}", owner, repo));
        debug!(%url, "Fetching repository info");

        let resp = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgunblockError::Network(format!("Repository info request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match error_detail(&body) {
                Some(detail) => AgunblockError::Backend(detail),
                None => AgunblockError::Http { status: status.as_u16(), body },
            });
        }

        resp.json().await
            .map_err(|e| AgunblockError::Stream(format!("Invalid repository info: {}", e)))
    }

    fn backend_name(&self) -> &str { "http" }
}

/// Turn a non-2xx response into `AgunblockError::Http`, keeping the body
/// for diagnostics.
pub(crate) async fn ensure_success(resp: Response) -> Result<Response, AgunblockError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "Request failed");
    Err(AgunblockError::Http { status: status.as_u16(), body })
}

/// Pull a human-readable message out of an error body: `{"error": ..}` or
/// FastAPI's `{"detail": ..}`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail", "message"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_variants() {
        assert_eq!(error_detail(r#"{"error":"boom"}"#).as_deref(), Some("boom"));
        assert_eq!(error_detail(r#"{"detail":"Not Found"}"#).as_deref(), Some("Not Found"));
        assert_eq!(error_detail(r#"{"error":null,"detail":"x"}"#).as_deref(), Some("x"));
        assert!(error_detail("<html>bad gateway</html>").is_none());
        assert!(error_detail(r#"{"status":"ok"}"#).is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/api/analyze"), "http://localhost:8000/api/analyze");
    }
}
