use std::path::PathBuf;

use async_trait::async_trait;

use super::StageOutcome;
use crate::audio::AssembledAudio;
use crate::error::ScriptcastError;

/// A talking-avatar video produced from the voiceover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedVideo {
    /// Provider-side identifier of the render job.
    pub video_id: String,
    /// Local file once downloaded.
    pub path: Option<PathBuf>,
}

/// Renders a talking-avatar video synced to the assembled audio.
#[async_trait]
pub trait AvatarRenderer: Send + Sync {
    async fn render(
        &self,
        audio: &AssembledAudio,
    ) -> Result<StageOutcome<RenderedVideo>, ScriptcastError>;
}

/// Placeholder renderer for deployments without avatar rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedAvatarRenderer;

#[async_trait]
impl AvatarRenderer for UnimplementedAvatarRenderer {
    async fn render(
        &self,
        audio: &AssembledAudio,
    ) -> Result<StageOutcome<RenderedVideo>, ScriptcastError> {
        tracing::info!(
            bytes = audio.bytes().len(),
            "Avatar rendering is not available; voiceover left as-is"
        );
        Ok(StageOutcome::NotImplemented {
            capability: "avatar-rendering",
        })
    }
}
