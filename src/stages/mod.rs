//! Downstream stages: avatar rendering and video upload.
//!
//! Both are capability interfaces. The built-in implementations report
//! [`StageOutcome::NotImplemented`] so callers can tell a missing
//! capability apart from a failure.

pub mod avatar;
pub mod upload;

pub use avatar::{AvatarRenderer, RenderedVideo, UnimplementedAvatarRenderer};
pub use upload::{UnimplementedUploader, UploadMetadata, UploadReceipt, UploadRequest, VideoUploader};

/// Result of a downstream stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    Completed(T),
    NotImplemented { capability: &'static str },
}

impl<T> StageOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::NotImplemented { .. } => None,
        }
    }
}
