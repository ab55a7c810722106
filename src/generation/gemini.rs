//! Google Gemini script generator (`models/{model}:generateContent`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ScriptGenerator, ScriptRequest, DEFAULT_GEMINI_MODEL};
use crate::error::ScriptcastError;
use crate::provider::http::{api_key_headers, ensure_success, shared_client, trim_trailing_slash};
use crate::provider::Service;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

pub struct GeminiScriptGenerator {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl GeminiScriptGenerator {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, request: &ScriptRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                {"parts": [{"text": request.render()}]}
            ]
        })
    }

    async fn generate_once(&self, request: &ScriptRequest) -> Result<String, ScriptcastError> {
        let body = self.build_request_body(request);
        let url = format!(
            "{}/models/{}:generateContent",
            trim_trailing_slash(&self.base_url),
            self.model
        );

        let headers = api_key_headers("x-goog-api-key", &self.api_key);

        debug!(model = %self.model, topic = %request.topic, "Gemini generateContent");

        with_timeout(Service::Gemini, self.timeout, async {
            let resp = shared_client()
                .post(&url)
                .headers(headers)
                .json(&body)
                .send()
                .await?;

            let resp = ensure_success(Service::Gemini, resp).await?;
            let raw = resp.text().await?;
            extract_text(&raw)
        })
        .await
    }
}

impl std::fmt::Debug for GeminiScriptGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiScriptGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ScriptGenerator for GeminiScriptGenerator {
    async fn generate(&self, request: &ScriptRequest) -> Result<String, ScriptcastError> {
        if self.api_key.trim().is_empty() {
            return Err(ScriptcastError::MissingCredential {
                service: Service::Gemini,
            });
        }
        if request.topic.trim().is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Topic cannot be empty".to_string(),
            ));
        }
        self.retry_policy
            .execute(|| self.generate_once(request))
            .await
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(raw: &str) -> Result<String, ScriptcastError> {
    let data: GeminiResponse = serde_json::from_str(raw).map_err(|e| {
        ScriptcastError::malformed(Service::Gemini, format!("unexpected response body: {e}"))
    })?;

    let candidate = data.candidates.into_iter().next().ok_or_else(|| {
        ScriptcastError::malformed(Service::Gemini, "no candidates in response")
    })?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(ScriptcastError::malformed(
            Service::Gemini,
            format!("candidate has no text (finish reason: {reason})"),
        ));
    }
    Ok(text)
}

// Internal Gemini response types

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
