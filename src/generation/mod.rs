//! Script generation: prompt assembly and the generation-service trait.

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use bon::Builder;

use crate::error::ScriptcastError;

#[cfg(feature = "gemini")]
pub use gemini::GeminiScriptGenerator;
pub use prompt::PromptAssets;

/// Gemini model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Inputs for one script-generation call.
#[derive(Debug, Clone, Builder, PartialEq, Eq)]
pub struct ScriptRequest {
    #[builder(into)]
    pub topic: String,
    /// Instruction template placed before the samples.
    #[builder(into, default)]
    pub prompt: String,
    /// Reference scripts the service should imitate.
    #[builder(into, default)]
    pub samples: String,
}

impl ScriptRequest {
    /// The single text prompt sent to the generation service.
    pub fn render(&self) -> String {
        format!(
            "{}\n\nSample Scripts:\n{}\n\nVideo Topic: {}",
            self.prompt, self.samples, self.topic
        )
    }

    pub fn from_assets(topic: impl Into<String>, assets: &PromptAssets) -> Self {
        Self {
            topic: topic.into(),
            prompt: assets.prompt.clone(),
            samples: assets.samples.clone(),
        }
    }
}

/// A service that turns a topic into raw script text.
///
/// Returns the service's text unchanged; [`crate::script::parse_script`]
/// decides whether it is structured.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate(&self, request: &ScriptRequest) -> Result<String, ScriptcastError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_places_samples_and_topic_after_prompt() {
        let request = ScriptRequest::builder()
            .topic("octopus hearts")
            .prompt("Write a 30 second script.")
            .samples("Sample one\nSample two")
            .build();
        assert_eq!(
            request.render(),
            "Write a 30 second script.\n\nSample Scripts:\nSample one\nSample two\n\nVideo Topic: octopus hearts"
        );
    }

    #[test]
    fn builder_defaults_prompt_and_samples() {
        let request = ScriptRequest::builder().topic("t").build();
        assert!(request.prompt.is_empty());
        assert!(request.samples.is_empty());
    }
}
