//! Shared HTTP client, header builders, and status mapping.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use super::Service;
use crate::error::{ErrorDetails, ScriptcastError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// JSON headers carrying the API key in `header_name`.
pub fn api_key_headers(header_name: &'static str, api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert(header_name, val);
    }
    headers
}

pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Check a response status, turning non-2xx replies into [`ScriptcastError::Upstream`].
pub async fn ensure_success(
    service: Service,
    response: reqwest::Response,
) -> Result<reqwest::Response, ScriptcastError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let body = response.text().await.unwrap_or_default();
    let mut error = status_to_error(service, status.as_u16(), &body);
    if let ScriptcastError::Upstream {
        details: Some(details),
        ..
    } = &mut error
    {
        details.request_id = request_id;
    }
    Err(error)
}

/// Map an HTTP status and body to an upstream error.
///
/// Understands both `{"error": {"message", "status"}}` (Google) and
/// `{"detail": {"message", "status"}}` / `{"detail": "..."}` (ElevenLabs)
/// bodies. Anything else is passed through as the message.
pub fn status_to_error(service: Service, status: u16, body: &str) -> ScriptcastError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let Some(value) = parsed else {
        return ScriptcastError::upstream(service, status, body);
    };

    let envelope = value.get("error").or_else(|| value.get("detail"));
    let message = envelope
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(ToString::to_string)
        .unwrap_or_else(|| body.to_string());
    let provider_code = envelope
        .and_then(|e| e.get("status"))
        .and_then(|s| s.as_str())
        .map(ToString::to_string);
    let retry_after_ms = envelope
        .and_then(|e| e.get("retry_after"))
        .and_then(|r| r.as_f64())
        .map(|s| (s * 1000.0) as u64);

    ScriptcastError::upstream_with_details(
        service,
        status,
        message,
        ErrorDetails {
            provider_code,
            request_id: None,
            retry_after_ms,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_error_body_extracts_message_and_status() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        match status_to_error(Service::Gemini, 400, body) {
            ScriptcastError::Upstream {
                service,
                status,
                message,
                details,
            } => {
                assert_eq!(service, Service::Gemini);
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
                assert_eq!(
                    details.and_then(|d| d.provider_code).as_deref(),
                    Some("INVALID_ARGUMENT")
                );
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn elevenlabs_detail_body_extracts_message() {
        let body = r#"{"detail": {"status": "voice_not_found", "message": "A voice with that id was not found"}}"#;
        let err = status_to_error(Service::ElevenLabs, 404, body);
        assert!(
            matches!(err, ScriptcastError::Upstream { status: 404, ref message, .. } if message.contains("not found"))
        );
    }

    #[test]
    fn string_detail_is_used_as_message() {
        let err = status_to_error(Service::ElevenLabs, 422, r#"{"detail": "text is required"}"#);
        assert!(
            matches!(err, ScriptcastError::Upstream { ref message, .. } if message == "text is required")
        );
    }

    #[test]
    fn plain_body_passes_through() {
        let err = status_to_error(Service::Gemini, 503, "upstream overloaded");
        assert!(
            matches!(err, ScriptcastError::Upstream { status: 503, ref message, details: None, .. } if message == "upstream overloaded")
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn trim_trailing_slash_removes_all_trailing_slashes() {
        assert_eq!(trim_trailing_slash("http://localhost:8080//"), "http://localhost:8080");
    }
}
