//! Tests for the error system.

use scriptcast::error::unified::*;
use scriptcast::error::*;
use scriptcast::provider::Service;

#[test]
fn error_upstream_creation() {
    let err = ScriptcastError::upstream(Service::ElevenLabs, 404, "voice not found");
    assert!(matches!(&err, ScriptcastError::Upstream { status: 404, .. }));
    assert_eq!(
        err.to_string(),
        "elevenlabs error (status 404): voice not found"
    );
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: ScriptcastError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");

    let cases = vec![
        Case {
            error: ScriptcastError::MissingCredential {
                service: Service::Gemini,
            },
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: ScriptcastError::upstream(Service::Gemini, 403, "forbidden"),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: ScriptcastError::upstream(Service::ElevenLabs, 429, "too many"),
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ScriptcastError::upstream(Service::ElevenLabs, 502, "bad gateway"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ScriptcastError::upstream(Service::ElevenLabs, 422, "unprocessable"),
            expected_category: ErrorCategory::Upstream,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckRequest,
        },
        Case {
            error: ScriptcastError::Network(network_error),
            expected_category: ErrorCategory::Network,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ScriptcastError::Timeout {
                service: Service::Gemini,
                ms: 5000,
            },
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ScriptcastError::malformed(Service::Gemini, "no candidates"),
            expected_category: ErrorCategory::MalformedResponse,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Regenerate,
        },
        Case {
            error: ScriptcastError::EmptyInput,
            expected_category: ErrorCategory::EmptyInput,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Regenerate,
        },
        Case {
            error: ScriptcastError::Validation {
                index: 3,
                message: "end_time is before start_time".to_string(),
            },
            expected_category: ErrorCategory::Validation,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::FixScript,
        },
        Case {
            error: ScriptcastError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: ScriptcastError::Cancelled,
            expected_category: ErrorCategory::Cancelled,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::None,
        },
        Case {
            error: ScriptcastError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::None,
        },
        Case {
            error: ScriptcastError::InvalidState("no script".to_string()),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::None,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category);
        assert_eq!(case.error.is_retryable(), case.expected_retryable);
        assert_eq!(case.error.recovery_suggestion(), case.expected_recovery);
    }
}

#[test]
fn segment_failure_classifies_by_its_cause() {
    let err = ScriptcastError::SegmentFailed {
        index: 4,
        source: Box::new(ScriptcastError::upstream(Service::ElevenLabs, 503, "busy")),
    };
    assert_eq!(err.category(), ErrorCategory::Server);
    assert!(err.is_upstream());
    assert!(err.is_retryable());
    assert!(matches!(err.root(), ScriptcastError::Upstream { status: 503, .. }));
    assert!(err.to_string().contains("segment 4"));

    let std_source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(
        std_source.as_deref(),
        Some("elevenlabs error (status 503): busy")
    );
}

#[test]
fn only_transport_and_service_failures_are_upstream() {
    let timeout = ScriptcastError::Timeout {
        service: Service::ElevenLabs,
        ms: 1,
    };
    assert!(timeout.is_upstream());
    assert_eq!(timeout.to_string(), "elevenlabs request timed out after 1ms");
    assert!(ScriptcastError::upstream(Service::Gemini, 400, "x").is_upstream());
    assert!(!ScriptcastError::malformed(Service::Gemini, "x").is_upstream());
    assert!(!ScriptcastError::EmptyInput.is_upstream());
}

#[test]
fn error_upstream_with_details_sets_detail_fields() {
    let details = ErrorDetails {
        provider_code: Some("RESOURCE_EXHAUSTED".to_string()),
        request_id: Some("req-123".to_string()),
        retry_after_ms: Some(2000),
    };
    let err = ScriptcastError::upstream_with_details(Service::Gemini, 429, "slow down", details);

    match err {
        ScriptcastError::Upstream {
            status,
            message,
            details: Some(details),
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
            assert_eq!(details.provider_code.as_deref(), Some("RESOURCE_EXHAUSTED"));
            assert_eq!(details.request_id.as_deref(), Some("req-123"));
            assert_eq!(details.retry_after_ms, Some(2000));
        }
        other => panic!("expected upstream error with details, got {other:?}"),
    }
}

#[test]
fn hound_errors_convert() {
    let err: ScriptcastError = hound::Error::FormatError("bad riff").into();
    assert!(matches!(err, ScriptcastError::Audio(_)));
}
