//! Error types for scriptcast.

pub mod unified;

pub use unified::{ErrorCategory, ErrorDetails, RecoverySuggestion};

use thiserror::Error;

use crate::provider::Service;

/// Primary error type for every pipeline stage.
#[derive(Error, Debug)]
pub enum ScriptcastError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential for {service}")]
    MissingCredential { service: Service },

    #[error("{service} error (status {status}): {message}")]
    Upstream {
        service: Service,
        status: u16,
        message: String,
        details: Option<ErrorDetails>,
    },

    /// Transport failure. The request URL is stripped on conversion.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{service} request timed out after {ms}ms")]
    Timeout { service: Service, ms: u64 },

    #[error("Malformed {service} response: {message}")]
    MalformedResponse { service: Service, message: String },

    #[error("No audio segments to assemble")]
    EmptyInput,

    #[error("Segment {index} is invalid: {message}")]
    Validation { index: usize, message: String },

    #[error("Synthesis failed at segment {index}: {source}")]
    SegmentFailed {
        index: usize,
        #[source]
        source: Box<ScriptcastError>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audio encoding error: {0}")]
    Audio(String),
}

impl ScriptcastError {
    /// Create an upstream error without provider details.
    pub fn upstream(service: Service, status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Create an upstream error with provider details.
    pub fn upstream_with_details(
        service: Service,
        status: u16,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn malformed(service: Service, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            message: message.into(),
        }
    }

    /// The innermost error, looking through `SegmentFailed` wrappers.
    pub fn root(&self) -> &ScriptcastError {
        match self {
            Self::SegmentFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SegmentFailed { source, .. } => source.category(),
            Self::MissingCredential { .. } => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Upstream { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Upstream,
            },
            Self::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::EmptyInput => ErrorCategory::EmptyInput,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Cancelled => ErrorCategory::Cancelled,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether the failure came from a collaborator service or the
    /// transport to it.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.root(),
            Self::Upstream { .. } | Self::Network(_) | Self::Timeout { .. }
        )
    }

    /// Whether this error is potentially retryable without changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit
            | ErrorCategory::Network
            | ErrorCategory::Timeout
            | ErrorCategory::Server => RecoverySuggestion::RetryLater,
            ErrorCategory::MalformedResponse | ErrorCategory::EmptyInput => {
                RecoverySuggestion::Regenerate
            }
            ErrorCategory::Validation => RecoverySuggestion::FixScript,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Upstream => RecoverySuggestion::CheckRequest,
            ErrorCategory::Cancelled | ErrorCategory::Unknown => RecoverySuggestion::None,
        }
    }
}

impl From<reqwest::Error> for ScriptcastError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.without_url())
    }
}

impl From<hound::Error> for ScriptcastError {
    fn from(error: hound::Error) -> Self {
        match error {
            hound::Error::IoError(io) => Self::Io(io),
            other => Self::Audio(other.to_string()),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ScriptcastError>;
