//! Sequential, all-or-nothing synthesis of a structured script.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::segment::AudioSegment;
use super::tts::SpeechProvider;
use super::types::{AudioFormat, SpeechRequest, VoiceSettings};
use crate::error::{Result, ScriptcastError};
use crate::script::StructuredScript;

/// Default pause between consecutive synthesis requests.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Synthesizes every non-blank segment of a script, one request at a time.
///
/// Requests never run concurrently, and a fixed pacing delay separates
/// consecutive requests to stay under per-account rate limits. The batch is
/// all-or-nothing: the first failure discards everything produced so far.
#[derive(Clone)]
pub struct SegmentSynthesizer {
    provider: Arc<dyn SpeechProvider>,
    voice_id: String,
    settings: VoiceSettings,
    format: AudioFormat,
    pacing: Duration,
}

impl std::fmt::Debug for SegmentSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentSynthesizer")
            .field("voice_id", &self.voice_id)
            .field("settings", &self.settings)
            .field("format", &self.format)
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}

impl SegmentSynthesizer {
    pub fn new(provider: Arc<dyn SpeechProvider>, voice_id: impl Into<String>) -> Self {
        Self {
            provider,
            voice_id: voice_id.into(),
            settings: VoiceSettings::default(),
            format: AudioFormat::default(),
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_settings(mut self, settings: VoiceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Synthesize `script` in segment order.
    ///
    /// The voice id, format and settings are checked before any request.
    /// Blank segments are skipped without a request. On failure the error
    /// is wrapped in [`ScriptcastError::SegmentFailed`] carrying the
    /// segment's script index. Cancellation is observed before each request,
    /// while a request is in flight, and during pacing; it yields
    /// [`ScriptcastError::Cancelled`].
    pub async fn synthesize(
        &self,
        script: &StructuredScript,
        cancel: &CancellationToken,
    ) -> Result<Vec<AudioSegment>> {
        if self.voice_id.trim().is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Voice id cannot be empty".to_string(),
            ));
        }
        self.format.validate()?;
        self.settings.validate()?;

        let pending: Vec<_> = script
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| !segment.is_blank())
            .collect();

        let skipped = script.segments.len() - pending.len();
        tracing::info!(
            title = %script.title,
            segments = pending.len(),
            skipped,
            "Starting synthesis batch"
        );

        let mut produced = Vec::with_capacity(pending.len());
        for (position, (index, segment)) in pending.into_iter().enumerate() {
            if position > 0 && !self.pacing.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ScriptcastError::Cancelled),
                    _ = tokio::time::sleep(self.pacing) => {}
                }
            }
            if cancel.is_cancelled() {
                return Err(ScriptcastError::Cancelled);
            }

            let request = SpeechRequest {
                text: segment.text.clone(),
                voice_id: self.voice_id.clone(),
                settings: self.settings,
                format: self.format,
            };

            tracing::debug!(segment = index, "Synthesizing segment");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ScriptcastError::Cancelled),
                result = self.provider.synthesize(&request) => result,
            };
            let audio = result.map_err(|e| {
                tracing::warn!(segment = index, error = %e, "Segment synthesis failed, aborting batch");
                ScriptcastError::SegmentFailed {
                    index,
                    source: Box::new(e),
                }
            })?;

            produced.push(AudioSegment::new(index, segment, self.format, audio));
        }

        tracing::info!(segments = produced.len(), "Synthesis batch complete");
        Ok(produced)
    }
}
