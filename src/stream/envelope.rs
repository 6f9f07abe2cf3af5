use serde_json::Value;
use thiserror::Error;
use crate::models::{AnalysisResult, ProgressEvent};

/// Literal prefix of every line that carries an envelope.
pub const DATA_PREFIX: &str = "data: ";

const DEFAULT_ERROR: &str = "Analysis failed";

/// One message from the analysis stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Progress(ProgressEvent),
    FinalResult(AnalysisResult),
    Complete,
    Error { error: String },
    /// Well-formed JSON that is neither terminal nor a progress update.
    Ignored,
}

impl Envelope {
    /// Terminal envelopes end the session; nothing after them is read.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Envelope::FinalResult(_) | Envelope::Complete | Envelope::Error { .. })
    }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {kind} envelope: {source}")]
    Shape {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse one complete line. Returns `None` for lines that do not carry the
/// `data: ` prefix (blank separators, `event:`/`id:` fields, comments).
pub fn parse_line(line: &str) -> Option<Result<Envelope, EnvelopeError>> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(parse_payload(payload))
}

/// Dispatch a JSON payload on its `type` discriminator. A payload without a
/// recognised type is a progress envelope when it has both `step` and
/// `status`.
pub fn parse_payload(payload: &str) -> Result<Envelope, EnvelopeError> {
    let value: Value = serde_json::from_str(payload)?;

    match value.get("type").and_then(Value::as_str) {
        Some("error") => Ok(Envelope::Error { error: error_text(&value) }),
        Some("final_result") => {
            let data = value.get("data").cloned().unwrap_or(Value::Null);
            serde_json::from_value(data)
                .map(Envelope::FinalResult)
                .map_err(|source| EnvelopeError::Shape { kind: "final_result", source })
        }
        Some("complete") => Ok(Envelope::Complete),
        _ if is_truthy(value.get("step")) && is_truthy(value.get("status")) => {
            serde_json::from_value(value)
                .map(Envelope::Progress)
                .map_err(|source| EnvelopeError::Shape { kind: "progress", source })
        }
        _ => Ok(Envelope::Ignored),
    }
}

fn error_text(value: &Value) -> String {
    match value.get("error") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR)
            .to_string(),
        Some(other) => other.to_string(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgressStatus;

    #[test]
    fn test_non_data_lines_skipped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("event: progress").is_none());
        assert!(parse_line(": keep-alive").is_none());
        assert!(parse_line("data:{\"type\":\"complete\"}").is_none());
    }

    #[test]
    fn test_progress_envelope() {
        let env = parse_line(
            r#"data: {"step":2,"status":"in_progress","message":"x","progress_percentage":50}"#,
        ).unwrap().unwrap();
        match env {
            Envelope::Progress(ev) => {
                assert_eq!(ev.step, 2);
                assert_eq!(ev.status, ProgressStatus::InProgress);
                assert_eq!(ev.progress_percentage, Some(50.0));
            }
            other => panic!("expected progress, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_envelopes() {
        let err = parse_payload(r#"{"type":"error","error":"repo not found"}"#).unwrap();
        assert_eq!(err, Envelope::Error { error: "repo not found".into() });
        assert!(err.is_terminal());

        let done = parse_payload(r#"{"type":"complete"}"#).unwrap();
        assert_eq!(done, Envelope::Complete);
        assert!(done.is_terminal());

        let fin = parse_payload(
            r#"{"type":"final_result","data":{"agentId":"devin","repoName":"o/r","analysis":"**Done**"}}"#,
        ).unwrap();
        match &fin {
            Envelope::FinalResult(r) => assert_eq!(r.analysis, "**Done**"),
            other => panic!("expected final result, got {:?}", other),
        }
        assert!(fin.is_terminal());
    }

    #[test]
    fn test_error_envelope_without_text_gets_default() {
        let env = parse_payload(r#"{"type":"error"}"#).unwrap();
        assert_eq!(env, Envelope::Error { error: "Analysis failed".into() });

        let empty = parse_payload(r#"{"type":"error","error":""}"#).unwrap();
        assert_eq!(empty, Envelope::Error { error: "Analysis failed".into() });

        let with_message = parse_payload(r#"{"type":"error","error":"","message":"Rate limited"}"#).unwrap();
        assert_eq!(with_message, Envelope::Error { error: "Rate limited".into() });
    }

    #[test]
    fn test_malformed_json_is_error() {
        let res = parse_line("data: {not json}").unwrap();
        assert!(matches!(res, Err(EnvelopeError::Json(_))));
    }

    #[test]
    fn test_final_result_missing_data_is_shape_error() {
        let res = parse_payload(r#"{"type":"final_result"}"#);
        assert!(matches!(res, Err(EnvelopeError::Shape { kind: "final_result", .. })));
    }

    #[test]
    fn test_payload_without_step_or_status_ignored() {
        assert_eq!(parse_payload(r#"{"message":"heartbeat"}"#).unwrap(), Envelope::Ignored);
        assert_eq!(parse_payload(r#"{"step":1}"#).unwrap(), Envelope::Ignored);
        assert_eq!(parse_payload(r#"{"step":0,"status":"starting"}"#).unwrap(), Envelope::Ignored);
        assert!(!Envelope::Ignored.is_terminal());
    }
}
