use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::audio::{AudioFormat, VoiceSettings};

/// Container requested from the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputContainer {
    #[default]
    Pcm,
    Wav,
}

/// Non-secret settings, read from the `[settings]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gemini_model: String,
    pub tts_model: String,
    /// ElevenLabs voice (usually a cloned voice).
    pub voice_id: String,
    pub voice_settings: VoiceSettings,
    pub sample_rate: u32,
    pub output: OutputContainer,
    /// Delay between consecutive synthesis requests.
    pub pacing_ms: u64,
    /// Per-request timeout for every collaborator call.
    pub timeout_secs: u64,
    /// Attempts per collaborator call, including the first.
    pub max_attempts: u32,
    pub prompt_path: PathBuf,
    pub samples_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_model: crate::generation::DEFAULT_GEMINI_MODEL.to_string(),
            tts_model: crate::audio::DEFAULT_TTS_MODEL.to_string(),
            voice_id: String::new(),
            voice_settings: VoiceSettings::default(),
            sample_rate: 44_100,
            output: OutputContainer::Pcm,
            pacing_ms: 500,
            timeout_secs: 90,
            max_attempts: 3,
            prompt_path: PathBuf::from("assets/prompt.txt"),
            samples_path: PathBuf::from("assets/sample_scripts.txt"),
        }
    }
}

impl Settings {
    pub fn audio_format(&self) -> AudioFormat {
        match self.output {
            OutputContainer::Pcm => AudioFormat::Pcm16 {
                sample_rate: self.sample_rate,
            },
            OutputContainer::Wav => AudioFormat::Wav {
                sample_rate: self.sample_rate,
            },
        }
    }
}

/// On-disk layout of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ConfigFile {
    /// Keyed by service name (`gemini`, `elevenlabs`, ...).
    pub api_keys: HashMap<String, String>,
    pub base_urls: HashMap<String, String>,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let file: ConfigFile = toml::from_str("[settings]\npacing_ms = 0\n").unwrap();
        assert_eq!(file.settings.pacing_ms, 0);
        assert_eq!(file.settings.sample_rate, 44_100);
        assert_eq!(file.settings.max_attempts, 3);
        assert!(file.api_keys.is_empty());
    }

    #[test]
    fn default_format_is_pcm() {
        assert_eq!(
            Settings::default().audio_format(),
            AudioFormat::Pcm16 {
                sample_rate: 44_100
            }
        );
    }
}
