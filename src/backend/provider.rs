use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use crate::errors::AgunblockError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, RepoInfo};

/// Raw response body of the streaming endpoint, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, AgunblockError>> + Send>>;

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Start a streaming analysis. Resolves once the response headers are in
    /// and the status is 2xx; the body is read lazily through the stream.
    async fn open_analysis_stream(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<ByteStream, AgunblockError>;

    /// One-shot analysis without progress updates.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AgunblockError>;

    async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, AgunblockError>;

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}
