use serde_json::Value;
use thiserror::Error;

/// Unified error type for the Uberduck client.
///
/// Every failure this crate can produce is a variant of this enum, so callers
/// can match broadly (any `UberduckError`) or on a specific kind. The first
/// four variants are the remote service's failure vocabulary; the remaining
/// ones carry local transport, I/O and playback failures through unchanged.
#[derive(Debug, Error)]
pub enum UberduckError {
    /// The service reported that the requested voice does not exist.
    ///
    /// Carries the voice name as it was transmitted (lower-cased). Empty when
    /// the failing call had no voice in flight, e.g. a catalog fetch.
    #[error("invalid voice: {0:?}")]
    InvalidVoice(String),

    /// The API key/secret pair was rejected (HTTP 401).
    #[error("invalid API credentials; check your API key and secret")]
    Unauthorized,

    /// The API key is being rate-limited (HTTP 429).
    #[error("rate-limited by the API; try again later")]
    RateLimited,

    /// Any other non-2xx response, with the raw status and detail payload.
    #[error("unexpected HTTP response: status {status}, detail {detail}")]
    Http { status: u16, detail: Value },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Output device, sink or WAV decode failure during playback.
    #[error("audio playback error: {0}")]
    Playback(String),

    /// The client was built with incomplete or invalid settings.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, UberduckError>;

/// Classify a remote response after every API call.
///
/// A status in 200-299 never fails, regardless of body content. Outside that
/// range exactly one variant is produced, in precedence order: voice-not-found
/// detail, rejected credentials, rate limit, then the generic HTTP carrier.
/// `voice` is the name as transmitted and is only present on submission calls.
pub(crate) fn classify(status: u16, body: &Value, voice: Option<&str>) -> Result<()> {
    if (200..=299).contains(&status) {
        tracing::debug!(status, "checked for HTTP errors, none found");
        return Ok(());
    }
    let detail = body.get("detail").and_then(Value::as_str);
    if detail == Some("That voice does not exist") {
        let voice = voice.unwrap_or_default().to_owned();
        tracing::error!(status, voice = %voice, "voice does not exist");
        return Err(UberduckError::InvalidVoice(voice));
    }
    if status == 401 && detail == Some("Could not validate credentials") {
        tracing::error!(status, "API key and/or secret rejected");
        return Err(UberduckError::Unauthorized);
    }
    if status == 429 {
        tracing::error!(status, "rate-limited by the API");
        return Err(UberduckError::RateLimited);
    }
    tracing::error!(status, detail = %body, "unexpected HTTP response");
    Err(UberduckError::Http {
        status,
        detail: body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_range_never_fails() {
        for status in 200..=299 {
            assert!(classify(status, &json!({}), None).is_ok());
            // Body content is irrelevant inside the success range, even an
            // error-shaped detail.
            let trap = json!({ "detail": "That voice does not exist" });
            assert!(classify(status, &trap, Some("duck")).is_ok());
        }
    }

    #[test]
    fn voice_detail_yields_invalid_voice() {
        let body = json!({ "detail": "That voice does not exist" });
        match classify(404, &body, Some("voice1")) {
            Err(UberduckError::InvalidVoice(voice)) => assert_eq!(voice, "voice1"),
            other => panic!("expected InvalidVoice, got {:?}", other),
        }
    }

    #[test]
    fn voice_detail_without_voice_context() {
        let body = json!({ "detail": "That voice does not exist" });
        match classify(404, &body, None) {
            Err(UberduckError::InvalidVoice(voice)) => assert!(voice.is_empty()),
            other => panic!("expected InvalidVoice, got {:?}", other),
        }
    }

    #[test]
    fn voice_detail_takes_precedence_over_rate_limit() {
        let body = json!({ "detail": "That voice does not exist" });
        assert!(matches!(
            classify(429, &body, Some("voice1")),
            Err(UberduckError::InvalidVoice(_))
        ));
    }

    #[test]
    fn unauthorized_requires_credential_detail() {
        let body = json!({ "detail": "Could not validate credentials" });
        assert!(matches!(
            classify(401, &body, None),
            Err(UberduckError::Unauthorized)
        ));
        // A 401 with any other detail is the generic carrier.
        let other = json!({ "detail": "something else" });
        assert!(matches!(
            classify(401, &other, None),
            Err(UberduckError::Http { status: 401, .. })
        ));
    }

    #[test]
    fn status_429_yields_rate_limited() {
        assert!(matches!(
            classify(429, &json!({}), None),
            Err(UberduckError::RateLimited)
        ));
    }

    #[test]
    fn other_failures_carry_status_and_detail() {
        let body = json!({ "detail": "Internal Server Error" });
        match classify(500, &body, None) {
            Err(UberduckError::Http { status, detail }) => {
                assert_eq!(status, 500);
                assert_eq!(detail, body);
            }
            other => panic!("expected Http, got {:?}", other),
        }
    }

    #[test]
    fn non_object_bodies_classify_cleanly() {
        // The catalog endpoint returns an array on success; a failure with a
        // non-object body must still map to the generic carrier.
        assert!(matches!(
            classify(502, &json!(["unexpected"]), None),
            Err(UberduckError::Http { status: 502, .. })
        ));
    }
}
