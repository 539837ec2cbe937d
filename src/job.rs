//! Synthesis job handle and status interpretation.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{classify, Result};

/// Handle for one in-flight synthesis request.
///
/// The uuid is issued by the service at submission and stays bound to this
/// (speech, voice) pair for the whole lifetime of the job; it is never reused
/// across requests. Jobs are transient and not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisJob {
    /// Opaque token issued by the submission endpoint.
    pub uuid: String,
    /// The text being rendered.
    pub speech: String,
    /// The voice name as transmitted (lower-cased).
    pub voice: String,
}

/// Receipt returned by the submission endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SpeakReceipt {
    pub uuid: String,
}

/// Completion state of a job, as reported by one status query.
///
/// `Ready` is the only terminal state; fatal classifications abort the poll
/// loop as errors rather than resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Audio is not rendered yet; query again after the poll interval.
    Pending,
    /// Audio is rendered and fetchable at the contained path.
    Ready(String),
}

impl JobStatus {
    /// Interpret one status response.
    ///
    /// The classifier runs first, so a fatal classification propagates before
    /// the body is inspected. Otherwise the job is ready exactly when the
    /// `path` field is present and non-empty.
    pub(crate) fn from_response(status: u16, body: &Value) -> Result<Self> {
        classify(status, body, None)?;
        match body.get("path").and_then(Value::as_str) {
            Some(path) if !path.is_empty() => Ok(JobStatus::Ready(path.to_owned())),
            _ => Ok(JobStatus::Pending),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, JobStatus::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UberduckError;
    use serde_json::json;

    #[test]
    fn missing_null_or_empty_path_is_pending() {
        assert_eq!(
            JobStatus::from_response(200, &json!({})).unwrap(),
            JobStatus::Pending
        );
        assert_eq!(
            JobStatus::from_response(200, &json!({ "path": null })).unwrap(),
            JobStatus::Pending
        );
        assert_eq!(
            JobStatus::from_response(200, &json!({ "path": "" })).unwrap(),
            JobStatus::Pending
        );
    }

    #[test]
    fn present_path_is_ready() {
        let body = json!({ "path": "https://audio/abc.wav", "finished_at": "now" });
        assert_eq!(
            JobStatus::from_response(200, &body).unwrap(),
            JobStatus::Ready("https://audio/abc.wav".to_owned())
        );
    }

    #[test]
    fn fatal_classification_wins_over_path() {
        // Even with a path present, a failing status aborts the poll.
        let body = json!({ "path": "https://audio/abc.wav" });
        assert!(matches!(
            JobStatus::from_response(429, &body),
            Err(UberduckError::RateLimited)
        ));
    }
}
