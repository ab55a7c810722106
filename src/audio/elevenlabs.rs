//! ElevenLabs text-to-speech provider (`/v1/text-to-speech/{voice_id}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::tts::SpeechProvider;
use super::types::{AudioFormat, SpeechRequest};
use super::DEFAULT_TTS_MODEL;
use crate::error::ScriptcastError;
use crate::provider::http::{api_key_headers, ensure_success, shared_client, trim_trailing_slash};
use crate::provider::Service;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// ElevenLabs speech provider.
#[derive(Debug, Clone)]
pub struct ElevenLabsSpeechProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ElevenLabsSpeechProvider {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: DEFAULT_TTS_MODEL.to_string(),
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

    fn validate_request(&self, request: &SpeechRequest) -> Result<(), ScriptcastError> {
        if self.api_key.trim().is_empty() {
            return Err(ScriptcastError::MissingCredential {
                service: Service::ElevenLabs,
            });
        }
        if request.text.trim().is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Speech text cannot be empty".to_string(),
            ));
        }
        if request.voice_id.trim().is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Voice id cannot be empty".to_string(),
            ));
        }
        request.settings.validate()?;
        request.format.validate()
    }

    async fn synthesize_once(&self, request: &SpeechRequest) -> Result<Vec<u8>, ScriptcastError> {
        let payload = serde_json::json!({
            "text": request.text,
            "model_id": self.model,
            "voice_settings": request.settings,
        });

        let url = format!(
            "{}/v1/text-to-speech/{}",
            trim_trailing_slash(&self.base_url),
            request.voice_id.trim()
        );
        let headers = api_key_headers("xi-api-key", &self.api_key);

        tracing::debug!(
            voice_id = %request.voice_id,
            chars = request.text.chars().count(),
            format = output_format_name(request.format),
            "ElevenLabs synthesize"
        );

        with_timeout(Service::ElevenLabs, self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(headers)
                .query(&[("output_format", output_format_name(request.format))])
                .json(&payload)
                .send()
                .await?;

            parse_speech_response(response).await
        })
        .await
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsSpeechProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ScriptcastError> {
        self.validate_request(request)?;
        self.retry_policy
            .execute(|| self.synthesize_once(request))
            .await
    }
}

/// ElevenLabs `output_format` query value.
pub fn output_format_name(format: AudioFormat) -> String {
    match format {
        AudioFormat::Pcm16 { sample_rate } => format!("pcm_{sample_rate}"),
        AudioFormat::Wav { sample_rate } => format!("wav_{sample_rate}"),
    }
}

async fn parse_speech_response(response: reqwest::Response) -> Result<Vec<u8>, ScriptcastError> {
    let response = ensure_success(Service::ElevenLabs, response).await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") || content_type.starts_with("text/") {
        let body = response.text().await.unwrap_or_default();
        let message = extract_detail_message(&body)
            .unwrap_or_else(|| format!("expected audio payload, got '{content_type}'"));
        return Err(ScriptcastError::malformed(Service::ElevenLabs, message));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(ScriptcastError::malformed(
            Service::ElevenLabs,
            "response contained an empty audio payload",
        ));
    }

    Ok(bytes.to_vec())
}

fn extract_detail_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = parsed.get("detail")?;
    detail
        .get("message")
        .unwrap_or(detail)
        .as_str()
        .map(ToString::to_string)
}
