use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle status reported by the backend for one analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Starting,
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A single progress envelope received from the analysis stream.
/// Immutable once received; sessions keep them in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: u32,
    #[serde(default)]
    pub step_name: String,
    pub status: ProgressStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
    /// Seconds spent in this step so far, as measured by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_event() {
        let ev: ProgressEvent = serde_json::from_str(
            r#"{"step":1,"status":"starting","message":"Scanning","progress_percentage":10}"#,
        ).unwrap();
        assert_eq!(ev.step, 1);
        assert_eq!(ev.status, ProgressStatus::Starting);
        assert_eq!(ev.message, "Scanning");
        assert_eq!(ev.progress_percentage, Some(10.0));
        assert!(ev.step_name.is_empty());
        assert!(ev.details.is_none());
    }

    #[test]
    fn test_deserialize_full_event() {
        let ev: ProgressEvent = serde_json::from_str(
            r#"{"step":2,"step_name":"Identifying Configuration Files","status":"in_progress",
                "message":"Found package.json","progress_percentage":55.5,"elapsed_time":3.2,
                "details":{"files_found":4}}"#,
        ).unwrap();
        assert_eq!(ev.status, ProgressStatus::InProgress);
        assert_eq!(ev.elapsed_time, Some(3.2));
        assert_eq!(ev.details.unwrap()["files_found"], 4);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let res: Result<ProgressEvent, _> =
            serde_json::from_str(r#"{"step":1,"status":"paused"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_status_display_matches_wire_name() {
        assert_eq!(ProgressStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_value(ProgressStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
    }
}
