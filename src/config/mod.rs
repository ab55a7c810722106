//! Configuration system (layered: code > env > config file > defaults).

mod settings;

pub use settings::{OutputContainer, Settings};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use crate::error::{Result, ScriptcastError};
use crate::provider::Service;

#[cfg(feature = "elevenlabs")]
use crate::audio::ElevenLabsSpeechProvider;
use crate::audio::SegmentSynthesizer;
#[cfg(feature = "gemini")]
use crate::generation::GeminiScriptGenerator;
#[cfg(any(feature = "gemini", feature = "elevenlabs"))]
use crate::util::retry::RetryPolicy;

/// Global default config (lazy-initialized from file and env).
static DEFAULT_CONFIG: OnceLock<ScriptcastConfig> = OnceLock::new();

/// Layered configuration for scriptcast.
///
/// Credentials and base URLs are keyed by [`Service`]. They are shared
/// behind `Arc<RwLock<..>>` so a cloned config observes later `set_*` calls.
#[derive(Clone, Default)]
pub struct ScriptcastConfig {
    api_keys: Arc<RwLock<HashMap<Service, String>>>,
    base_urls: Arc<RwLock<HashMap<Service, String>>>,
    settings: Settings,
}

impl std::fmt::Debug for ScriptcastConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services: Vec<Service> = self
            .api_keys
            .read()
            .map(|keys| keys.keys().copied().collect())
            .unwrap_or_default();
        f.debug_struct("ScriptcastConfig")
            .field("credentials_for", &services)
            .field("base_urls", &self.base_urls)
            .field("settings", &self.settings)
            .finish()
    }
}

const KEY_ENV_MAPPINGS: [(&str, Service); 6] = [
    ("GEMINI_API_KEY", Service::Gemini),
    ("GOOGLE_API_KEY", Service::Gemini),
    ("ELEVENLABS_API_KEY", Service::ElevenLabs),
    ("ELEVENLAB_API_KEY", Service::ElevenLabs),
    ("HEYGEN_API_KEY", Service::HeyGen),
    ("YOUTUBE_API_KEY", Service::YouTube),
];

const URL_ENV_MAPPINGS: [(&str, Service); 2] = [
    ("GEMINI_BASE_URL", Service::Gemini),
    ("ELEVENLABS_BASE_URL", Service::ElevenLabs),
];

impl ScriptcastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load from environment variables (`GEMINI_API_KEY`, `ELEVENLABS_API_KEY`, ...).
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.apply_env();
        config
    }

    /// Load `path` (or the default config file when `None`), then apply env.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        let mut config = Self::new();
        match std::fs::read_to_string(&path) {
            Ok(raw) => config.merge_toml(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {}
            Err(err) => {
                return Err(ScriptcastError::Configuration(format!(
                    "Cannot read {}: {err}",
                    path.display()
                )))
            }
        }
        config.apply_env();
        Ok(config)
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static ScriptcastConfig {
        DEFAULT_CONFIG.get_or_init(|| Self::load(None).unwrap_or_else(|_| Self::from_env()))
    }

    /// `~/.scriptcast/config.toml`.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".scriptcast"))
            .unwrap_or_else(|| PathBuf::from(".scriptcast"))
            .join("config.toml")
    }

    /// Merge a TOML document: a `[settings]` table plus optional
    /// `[api_keys]` and `[base_urls]` tables keyed by service name.
    pub fn merge_toml(&mut self, raw: &str) -> Result<()> {
        let file: settings::ConfigFile = toml::from_str(raw)
            .map_err(|e| ScriptcastError::Configuration(format!("Invalid config file: {e}")))?;
        for (name, key) in file.api_keys {
            self.set_api_key(parse_service(&name)?, key);
        }
        for (name, url) in file.base_urls {
            self.set_base_url(parse_service(&name)?, url);
        }
        self.settings = file.settings;
        Ok(())
    }

    fn apply_env(&mut self) {
        // The first variable listed for a service wins over its aliases.
        let mut resolved = Vec::new();
        for (env_var, service) in KEY_ENV_MAPPINGS {
            if resolved.contains(&service) {
                continue;
            }
            if let Ok(key) = std::env::var(env_var) {
                if !key.trim().is_empty() {
                    self.set_api_key(service, key);
                    resolved.push(service);
                }
            }
        }
        for (env_var, service) in URL_ENV_MAPPINGS {
            if let Ok(url) = std::env::var(env_var) {
                self.set_base_url(service, url);
            }
        }
        if let Ok(voice_id) = std::env::var("SCRIPTCAST_VOICE_ID") {
            self.settings.voice_id = voice_id;
        }
        if let Ok(raw) = std::env::var("SCRIPTCAST_PACING_MS") {
            match raw.trim().parse() {
                Ok(ms) => self.settings.pacing_ms = ms,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid SCRIPTCAST_PACING_MS"),
            }
        }
    }

    pub fn set_api_key(&self, service: Service, key: String) {
        if let Ok(mut keys) = self.api_keys.write() {
            keys.insert(service, key);
        }
    }

    pub fn get_api_key(&self, service: Service) -> Option<String> {
        self.api_keys.read().ok()?.get(&service).cloned()
    }

    /// Resolve a credential or fail with [`ScriptcastError::MissingCredential`].
    pub fn require_api_key(&self, service: Service) -> Result<String> {
        self.get_api_key(service)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ScriptcastError::MissingCredential { service })
    }

    pub fn set_base_url(&self, service: Service, url: String) {
        if let Ok(mut urls) = self.base_urls.write() {
            urls.insert(service, url);
        }
    }

    pub fn get_base_url(&self, service: Service) -> Option<String> {
        self.base_urls.read().ok()?.get(&service).cloned()
    }

    pub fn has_credentials(&self, service: Service) -> bool {
        self.require_api_key(service).is_ok()
    }

    #[cfg(any(feature = "gemini", feature = "elevenlabs"))]
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.settings.max_attempts,
            ..RetryPolicy::default()
        }
    }

    /// Gemini generator from the configured key, model and base URL.
    #[cfg(feature = "gemini")]
    pub fn gemini_generator(&self) -> Result<GeminiScriptGenerator> {
        let key = self.require_api_key(Service::Gemini)?;
        let generator = match self.get_base_url(Service::Gemini) {
            Some(url) => GeminiScriptGenerator::new_with_base_url(key, url),
            None => GeminiScriptGenerator::new(key),
        };
        Ok(generator
            .with_model(self.settings.gemini_model.clone())
            .with_timeout(Duration::from_secs(self.settings.timeout_secs))
            .with_retry_policy(self.retry_policy()))
    }

    /// ElevenLabs provider from the configured key, model and base URL.
    #[cfg(feature = "elevenlabs")]
    pub fn elevenlabs_provider(&self) -> Result<ElevenLabsSpeechProvider> {
        let key = self.require_api_key(Service::ElevenLabs)?;
        let provider = match self.get_base_url(Service::ElevenLabs) {
            Some(url) => ElevenLabsSpeechProvider::new_with_base_url(key, url),
            None => ElevenLabsSpeechProvider::new(key),
        };
        Ok(provider
            .with_model(self.settings.tts_model.clone())
            .with_timeout(Duration::from_secs(self.settings.timeout_secs))
            .with_retry_policy(self.retry_policy()))
    }

    /// Segment synthesizer over the configured ElevenLabs provider.
    #[cfg(feature = "elevenlabs")]
    pub fn synthesizer(&self) -> Result<SegmentSynthesizer> {
        let provider = Arc::new(self.elevenlabs_provider()?);
        self.synthesizer_with(provider)
    }

    /// Segment synthesizer over any provider, using the configured voice,
    /// voice settings, output format and pacing.
    pub fn synthesizer_with(
        &self,
        provider: Arc<dyn crate::audio::SpeechProvider>,
    ) -> Result<SegmentSynthesizer> {
        let format = self.settings.audio_format();
        format.validate()?;
        self.settings.voice_settings.validate()?;
        if self.settings.voice_id.trim().is_empty() {
            return Err(ScriptcastError::Configuration(
                "voice_id is not set (settings.voice_id or SCRIPTCAST_VOICE_ID)".to_string(),
            ));
        }
        Ok(SegmentSynthesizer::new(provider, self.settings.voice_id.clone())
            .with_settings(self.settings.voice_settings)
            .with_format(format)
            .with_pacing(Duration::from_millis(self.settings.pacing_ms)))
    }
}

fn parse_service(name: &str) -> Result<Service> {
    name.parse().map_err(|_| {
        ScriptcastError::Configuration(format!("Unknown service '{name}' in config file"))
    })
}
