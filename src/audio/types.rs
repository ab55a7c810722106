//! Audio request and payload types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptcastError};

/// Sample rates every supported speech service can produce.
pub const SUPPORTED_SAMPLE_RATES: [u32; 6] = [8_000, 16_000, 22_050, 24_000, 44_100, 48_000];

/// Payload format requested from the speech service.
///
/// Both formats carry 16-bit integer samples, which lets the assembler
/// insert silence exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "container", rename_all = "lowercase")]
pub enum AudioFormat {
    /// Raw little-endian mono PCM.
    Pcm16 { sample_rate: u32 },
    /// RIFF/WAVE with a 16-bit integer data chunk.
    Wav { sample_rate: u32 },
}

impl AudioFormat {
    pub fn sample_rate(&self) -> u32 {
        match self {
            Self::Pcm16 { sample_rate } | Self::Wav { sample_rate } => *sample_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.sample_rate();
        if !SUPPORTED_SAMPLE_RATES.contains(&rate) {
            return Err(ScriptcastError::InvalidArgument(format!(
                "Unsupported sample rate {rate}Hz; expected one of {SUPPORTED_SAMPLE_RATES:?}"
            )));
        }
        Ok(())
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Pcm16 {
            sample_rate: 44_100,
        }
    }
}

/// Voice-quality settings sent with every synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: None,
            use_speaker_boost: None,
        }
    }
}

impl VoiceSettings {
    pub fn validate(&self) -> Result<()> {
        let ranged = [
            ("stability", Some(self.stability)),
            ("similarity_boost", Some(self.similarity_boost)),
            ("style", self.style),
        ];
        for (name, value) in ranged {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(ScriptcastError::InvalidArgument(format!(
                        "Voice setting {name} must be between 0.0 and 1.0"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A single text-to-speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub settings: VoiceSettings,
    pub format: AudioFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_voice_settings_match_service_defaults() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        let settings = VoiceSettings {
            style: Some(1.5),
            ..VoiceSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ScriptcastError::InvalidArgument(msg)) if msg.contains("style")
        ));
    }

    #[test]
    fn unsupported_sample_rate_is_rejected() {
        assert!(AudioFormat::Wav { sample_rate: 11_025 }.validate().is_err());
        assert!(AudioFormat::Pcm16 { sample_rate: 24_000 }.validate().is_ok());
    }

    #[test]
    fn format_deserializes_from_tagged_table() {
        let format: AudioFormat =
            serde_json::from_str(r#"{"container": "wav", "sample_rate": 22050}"#).unwrap();
        assert_eq!(format, AudioFormat::Wav { sample_rate: 22_050 });
    }
}
