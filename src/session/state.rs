use serde::Serialize;
use crate::models::{AnalysisResult, ProgressEvent};
use crate::stream::Envelope;

/// Whether stream consumption should go on after folding an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminal,
}

/// Client-held state of one analysis run. Mutated only by folding stream
/// envelopes or recording a transport failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    pub is_analyzing: bool,
    /// Overall completion, 0..=100.
    pub progress: f64,
    pub current_step: u32,
    pub progress_updates: Vec<ProgressEvent>,
    pub results: Option<AnalysisResult>,
    pub error: Option<String>,
}

impl AnalysisSession {
    /// Idle state, before any analysis or after a reset.
    pub fn new() -> Self {
        Self {
            is_analyzing: false,
            progress: 0.0,
            current_step: 0,
            progress_updates: Vec::new(),
            results: None,
            error: None,
        }
    }

    /// State published the moment a run begins, before the request is sent.
    pub fn started() -> Self {
        Self {
            is_analyzing: true,
            current_step: 1,
            ..Self::new()
        }
    }

    /// Fold one envelope into the session.
    ///
    /// `progress` and `current_step` never move backwards; a progress
    /// envelope without a positive percentage leaves `progress` unchanged.
    pub fn apply(&mut self, envelope: Envelope) -> Flow {
        match envelope {
            Envelope::Error { error } => {
                self.error = Some(error);
                self.is_analyzing = false;
                Flow::Terminal
            }
            Envelope::FinalResult(result) => {
                self.results = Some(result);
                self.progress = 100.0;
                self.is_analyzing = false;
                Flow::Terminal
            }
            Envelope::Complete => {
                self.is_analyzing = false;
                Flow::Terminal
            }
            Envelope::Progress(event) => {
                self.current_step = self.current_step.max(event.step);
                if let Some(pct) = event.progress_percentage.filter(|p| *p > 0.0) {
                    self.progress = self.progress.max(pct.min(100.0));
                }
                self.progress_updates.push(event);
                Flow::Continue
            }
            Envelope::Ignored => Flow::Continue,
        }
    }

    /// Record a failure that ended the run outside the stream protocol
    /// (transport error, timeout, cancellation).
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_analyzing = false;
    }

    pub fn latest_update(&self) -> Option<&ProgressEvent> {
        self.progress_updates.last()
    }

    pub fn updates_for_step(&self, step: u32) -> impl Iterator<Item = &ProgressEvent> {
        self.progress_updates.iter().filter(move |u| u.step == step)
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgressStatus;

    fn progress(step: u32, status: ProgressStatus, pct: Option<f64>) -> Envelope {
        Envelope::Progress(ProgressEvent {
            step,
            step_name: String::new(),
            status,
            message: format!("step {}", step),
            progress_percentage: pct,
            elapsed_time: None,
            details: None,
        })
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            agent_id: "devin".into(),
            repo_name: "o/r".into(),
            analysis: "**Done**".into(),
            setup_commands: None,
        }
    }

    #[test]
    fn test_started_state() {
        let s = AnalysisSession::started();
        assert!(s.is_analyzing);
        assert_eq!(s.current_step, 1);
        assert_eq!(s.progress, 0.0);
        assert!(s.progress_updates.is_empty());
        assert!(s.results.is_none() && s.error.is_none());
    }

    #[test]
    fn test_progress_envelope_updates_step_and_percentage() {
        let mut s = AnalysisSession::started();
        assert_eq!(s.apply(progress(2, ProgressStatus::InProgress, Some(50.0))), Flow::Continue);
        assert_eq!(s.current_step, 2);
        assert_eq!(s.progress, 50.0);
        assert_eq!(s.progress_updates.len(), 1);
        assert!(s.is_analyzing);
    }

    #[test]
    fn test_missing_or_zero_percentage_keeps_progress() {
        let mut s = AnalysisSession::started();
        s.apply(progress(1, ProgressStatus::Starting, Some(30.0)));
        s.apply(progress(1, ProgressStatus::InProgress, None));
        assert_eq!(s.progress, 30.0);
        s.apply(progress(1, ProgressStatus::InProgress, Some(0.0)));
        assert_eq!(s.progress, 30.0);
        assert_eq!(s.progress_updates.len(), 3);
    }

    #[test]
    fn test_progress_and_step_never_decrease() {
        let mut s = AnalysisSession::started();
        s.apply(progress(3, ProgressStatus::InProgress, Some(80.0)));
        s.apply(progress(2, ProgressStatus::Completed, Some(60.0)));
        assert_eq!(s.current_step, 3);
        assert_eq!(s.progress, 80.0);
    }

    #[test]
    fn test_progress_keeps_high_water_mark_when_backend_reports_lower() {
        let mut s = AnalysisSession::started();
        for pct in [10.0, 45.0, 30.0] {
            s.apply(progress(2, ProgressStatus::InProgress, Some(pct)));
        }
        assert_eq!(s.apply(Envelope::Complete), Flow::Terminal);

        // The last envelope reported 30; the bar stays at the highest value seen.
        assert_eq!(s.latest_update().unwrap().progress_percentage, Some(30.0));
        assert_eq!(s.progress, 45.0);

        s.apply(progress(3, ProgressStatus::InProgress, Some(140.0)));
        assert_eq!(s.progress, 100.0);
    }

    #[test]
    fn test_final_result_forces_full_progress() {
        let mut s = AnalysisSession::started();
        s.apply(progress(1, ProgressStatus::Starting, Some(10.0)));
        assert_eq!(s.apply(Envelope::FinalResult(result())), Flow::Terminal);
        assert!(!s.is_analyzing);
        assert_eq!(s.progress, 100.0);
        assert_eq!(s.results.as_ref().unwrap().analysis, "**Done**");
    }

    #[test]
    fn test_error_envelope_is_terminal() {
        let mut s = AnalysisSession::started();
        assert_eq!(s.apply(Envelope::Error { error: "repo not found".into() }), Flow::Terminal);
        assert_eq!(s.error.as_deref(), Some("repo not found"));
        assert!(!s.is_analyzing);
        assert!(s.results.is_none());
    }

    #[test]
    fn test_complete_without_results() {
        let mut s = AnalysisSession::started();
        s.apply(progress(1, ProgressStatus::Completed, Some(40.0)));
        assert_eq!(s.apply(Envelope::Complete), Flow::Terminal);
        assert!(!s.is_analyzing);
        assert!(s.results.is_none());
        assert_eq!(s.progress, 40.0);
    }

    #[test]
    fn test_ignored_envelope_changes_nothing() {
        let mut s = AnalysisSession::started();
        assert_eq!(s.apply(Envelope::Ignored), Flow::Continue);
        assert_eq!(s, AnalysisSession::started());
    }

    #[test]
    fn test_fail_records_message() {
        let mut s = AnalysisSession::started();
        s.fail("HTTP error! status: 500");
        assert_eq!(s.error.as_deref(), Some("HTTP error! status: 500"));
        assert!(!s.is_analyzing);
    }

    #[test]
    fn test_serializes_camel_case() {
        let v = serde_json::to_value(AnalysisSession::started()).unwrap();
        assert_eq!(v["isAnalyzing"], true);
        assert_eq!(v["currentStep"], 1);
        assert!(v["progressUpdates"].as_array().unwrap().is_empty());
    }
}
