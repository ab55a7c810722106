//! Text-to-speech trait.

use async_trait::async_trait;

use super::types::SpeechRequest;
use crate::error::ScriptcastError;

/// Trait for text-to-speech providers.
///
/// Implementations own their credential; callers pass only the request.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Generate speech audio from text, returning the raw payload in
    /// `request.format`.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ScriptcastError>;
}
