//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Upstream,
    MalformedResponse,
    Validation,
    EmptyInput,
    Configuration,
    Cancelled,
    Unknown,
}

/// Structured details returned by a collaborator API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Provider-level error code, e.g. Gemini's `INVALID_ARGUMENT`.
    pub provider_code: Option<String>,
    pub request_id: Option<String>,
    pub retry_after_ms: Option<u64>,
}

/// Suggested recovery action.
///
/// `RetryLater` and `Regenerate` are the two outcomes a caller must tell
/// apart: the first means the service was unavailable, the second means
/// the service answered but its output could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryLater,
    Regenerate,
    CheckCredentials,
    CheckConfiguration,
    FixScript,
    /// The service refused the request itself; the text, voice or settings
    /// need changing.
    CheckRequest,
    None,
}
