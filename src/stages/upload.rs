use std::path::PathBuf;

use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};

use super::StageOutcome;
use crate::error::{Result, ScriptcastError};

/// Maximum title length accepted by YouTube.
pub const MAX_TITLE_CHARS: usize = 100;

/// Metadata for a Shorts upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct UploadMetadata {
    #[builder(into)]
    pub title: String,
    #[builder(into, default)]
    pub description: String,
    #[builder(default)]
    pub tags: Vec<String>,
}

impl UploadMetadata {
    /// Split a comma-separated tag list, trimming and dropping empty entries.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Upload title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ScriptcastError::InvalidArgument(format!(
                "Upload title exceeds {MAX_TITLE_CHARS} characters"
            )));
        }
        Ok(())
    }
}

/// What to upload and how to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Rendered video file.
    pub video: PathBuf,
    pub metadata: UploadMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub video_id: String,
    pub url: String,
}

/// Uploads a finished video to a hosting platform.
#[async_trait]
pub trait VideoUploader: Send + Sync {
    async fn upload(
        &self,
        request: &UploadRequest,
    ) -> std::result::Result<StageOutcome<UploadReceipt>, ScriptcastError>;
}

/// Placeholder uploader for deployments without platform upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedUploader;

#[async_trait]
impl VideoUploader for UnimplementedUploader {
    async fn upload(
        &self,
        request: &UploadRequest,
    ) -> std::result::Result<StageOutcome<UploadReceipt>, ScriptcastError> {
        request.metadata.validate()?;
        tracing::info!(title = %request.metadata.title, "Video upload is not available");
        Ok(StageOutcome::NotImplemented {
            capability: "video-upload",
        })
    }
}
