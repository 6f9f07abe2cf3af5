use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use crate::agents::catalog;
use crate::backend::{AnalysisBackend, ByteStream};
use crate::errors::AgunblockError;
use crate::models::AnalyzeRequest;
use crate::stream::{Envelope, EnvelopeDecoder, EnvelopeError};
use crate::utils::formatting::format_duration;
use super::state::{AnalysisSession, Flow};

pub const CANCELLED_MESSAGE: &str = "Analysis cancelled";
pub const INCOMPLETE_STREAM_MESSAGE: &str = "Analysis stream ended before completion";

/// Drives streaming analyses against a backend and publishes every state
/// change on a watch channel.
///
/// Only one run is active at a time: starting a new analysis cancels the
/// one in flight, and a superseded run never writes to the published state
/// again.
pub struct StreamingAnalysis {
    backend: Arc<dyn AnalysisBackend>,
    state: watch::Sender<AnalysisSession>,
    generation: AtomicU64,
    active: Mutex<Option<(u64, CancellationToken)>>,
    stream_timeout: Option<Duration>,
}

impl StreamingAnalysis {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (state, _) = watch::channel(AnalysisSession::new());
        Self {
            backend,
            state,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
            stream_timeout: None,
        }
    }

    /// Fail a run when no bytes arrive for `limit`.
    pub fn with_stream_timeout(mut self, limit: Option<Duration>) -> Self {
        self.stream_timeout = limit;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisSession> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AnalysisSession {
        self.state.borrow().clone()
    }

    pub fn is_analyzing(&self) -> bool {
        self.state.borrow().is_analyzing
    }

    /// Run one analysis to its end and return the final session.
    ///
    /// Backend-reported failures and transport failures both end up in the
    /// returned session's `error`; `Err` is reserved for invalid input and
    /// for runs superseded by a newer `start_analysis` or `reset`.
    pub async fn start_analysis(
        &self,
        agent_id: &str,
        owner: &str,
        repo: &str,
    ) -> Result<AnalysisSession, AgunblockError> {
        let request = validate_request(agent_id, owner, repo)?;
        let (generation, token) = self.begin();
        let run_id = Uuid::new_v4();

        let span = info_span!(
            "analysis",
            %run_id,
            agent_id = %request.agent_id,
            owner = %request.owner,
            repo = %request.repo,
        );

        async {
            info!(backend = self.backend.backend_name(), "Starting streaming analysis");
            let outcome = self.run(&request, &token, generation).await;
            self.end(generation);

            match outcome {
                Ok(()) => {}
                Err(AgunblockError::Cancelled) => {
                    if !self.update(generation, |s| s.fail(CANCELLED_MESSAGE)) {
                        debug!("Superseded analysis stopped");
                        return Err(AgunblockError::Cancelled);
                    }
                    info!("Analysis cancelled");
                }
                Err(e) => {
                    warn!(error = %e, error_type = e.classify().error_type, "Analysis failed");
                    if !self.update(generation, |s| s.fail(e.to_string())) {
                        return Err(AgunblockError::Cancelled);
                    }
                }
            }

            if self.generation.load(Ordering::SeqCst) != generation {
                return Err(AgunblockError::Cancelled);
            }
            let session = self.snapshot();
            info!(
                progress = session.progress,
                updates = session.progress_updates.len(),
                has_results = session.results.is_some(),
                error = session.error.as_deref().unwrap_or(""),
                "Analysis finished",
            );
            Ok(session)
        }
        .instrument(span)
        .await
    }

    /// Cancel the in-flight run, if any. Its session ends with
    /// `error = "Analysis cancelled"`.
    pub fn cancel(&self) {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some((_, token)) = active {
            token.cancel();
        }
    }

    /// Detach from any in-flight run and return to the idle state.
    pub fn reset(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some((_, token)) = active.take() {
            token.cancel();
        }
        self.state.send_replace(AnalysisSession::new());
    }

    /// Claim the published state for a new run, cancelling the previous one.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(AnalysisSession::started());
        let token = CancellationToken::new();
        if let Some((previous, stale)) = active.replace((generation, token.clone())) {
            debug!(previous, "Cancelling in-flight analysis");
            stale.cancel();
        }
        (generation, token)
    }

    fn end(&self, generation: u64) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(active.as_ref(), Some((g, _)) if *g == generation) {
            *active = None;
        }
    }

    async fn run(
        &self,
        request: &AnalyzeRequest,
        token: &CancellationToken,
        generation: u64,
    ) -> Result<(), AgunblockError> {
        let mut stream = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(AgunblockError::Cancelled),
            opened = self.within_limit(self.backend.open_analysis_stream(request)) => opened??,
        };

        let mut decoder = EnvelopeDecoder::new();
        loop {
            let chunk = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(AgunblockError::Cancelled),
                chunk = self.next_chunk(&mut stream) => chunk?,
            };
            let Some(chunk) = chunk else { break };

            for item in decoder.push(&chunk) {
                if self.fold(generation, item) == Flow::Terminal {
                    return Ok(());
                }
            }
        }

        if let Some(item) = decoder.finish() {
            if self.fold(generation, item) == Flow::Terminal {
                return Ok(());
            }
        }
        Err(AgunblockError::Stream(INCOMPLETE_STREAM_MESSAGE.into()))
    }

    async fn next_chunk(&self, stream: &mut ByteStream) -> Result<Option<Vec<u8>>, AgunblockError> {
        self.within_limit(stream.next()).await?.transpose()
    }

    /// Await `fut`, failing with `Timeout` once the stall limit elapses.
    /// Covers both waiting for response headers and waiting for the next
    /// chunk.
    async fn within_limit<F: Future>(&self, fut: F) -> Result<F::Output, AgunblockError> {
        match self.stream_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                AgunblockError::Timeout(format!(
                    "Analysis timed out after {} without data",
                    format_duration(limit.as_millis() as u64),
                ))
            }),
            None => Ok(fut.await),
        }
    }

    fn fold(&self, generation: u64, item: Result<Envelope, EnvelopeError>) -> Flow {
        let envelope = match item {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Skipping malformed stream envelope");
                return Flow::Continue;
            }
        };

        match &envelope {
            Envelope::Progress(ev) => debug!(
                step = ev.step,
                status = %ev.status,
                progress = ?ev.progress_percentage,
                message = %ev.message,
                "Progress update",
            ),
            Envelope::Error { error } => warn!(%error, "Backend reported analysis error"),
            Envelope::FinalResult(result) => debug!(repo = %result.repo_name, "Final result received"),
            Envelope::Complete => debug!("Stream completed"),
            Envelope::Ignored => debug!("Ignoring unrecognised envelope"),
        }

        // A superseded run stops at its next envelope.
        let mut flow = Flow::Terminal;
        self.update(generation, |s| flow = s.apply(envelope));
        flow
    }

    /// Apply `f` to the published state if `generation` still owns it.
    fn update<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut AnalysisSession),
    {
        self.state.send_if_modified(|session| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            f(session);
            true
        })
    }
}

/// Check the request before any state changes: `owner` and `repo` must be
/// single non-empty path segments and `agent_id` must be in the catalog.
/// Legacy agent ids are mapped to their current id.
pub fn validate_request(agent_id: &str, owner: &str, repo: &str) -> Result<AnalyzeRequest, AgunblockError> {
    let agent_id = catalog::resolve_id(agent_id.trim())
        .ok_or_else(|| AgunblockError::InvalidInput(format!("Unknown agent '{}'", agent_id)))?;

    for (field, value) in [("owner", owner), ("repo", repo)] {
        if value.trim().is_empty() {
            return Err(AgunblockError::InvalidInput(format!("{} must not be empty", field)));
        }
        if value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(AgunblockError::InvalidInput(format!(
                "{} '{}' must be a single path segment", field, value
            )));
        }
    }

    Ok(AnalyzeRequest::new(agent_id, owner, repo))
}
