//! CLI-specific error formatting for user-facing messages.

use crate::error::{RecoverySuggestion, ScriptcastError};

/// Map a [`ScriptcastError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &ScriptcastError) -> String {
    if let ScriptcastError::MissingCredential { service } = err.root() {
        let var = match service {
            crate::provider::Service::Gemini => "GEMINI_API_KEY",
            crate::provider::Service::ElevenLabs => "ELEVENLABS_API_KEY",
            crate::provider::Service::HeyGen => "HEYGEN_API_KEY",
            crate::provider::Service::YouTube => "YOUTUBE_API_KEY",
        };
        return format!("{err}. Set {var} in your environment, .env or config file");
    }

    match err.recovery_suggestion() {
        RecoverySuggestion::RetryLater => {
            format!("{err}. The service is unavailable; try again shortly")
        }
        RecoverySuggestion::Regenerate => {
            format!("{err}. The output could not be used; regenerate the script")
        }
        RecoverySuggestion::CheckCredentials => {
            format!("{err}. Check the API key for this service")
        }
        RecoverySuggestion::CheckConfiguration => {
            format!("{err}. Check your config file and environment")
        }
        RecoverySuggestion::FixScript => format!("{err}. Fix the segment timings and retry"),
        RecoverySuggestion::CheckRequest => format!(
            "{err}. The service rejected the request; check the script text, voice id and voice settings"
        ),
        RecoverySuggestion::None => format!("{err}"),
    }
}
