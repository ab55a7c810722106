//! Collaborator services and shared HTTP plumbing.

pub mod http;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// External services the pipeline talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Service {
    /// Script generation.
    Gemini,
    /// Speech synthesis.
    ElevenLabs,
    /// Talking-avatar rendering.
    HeyGen,
    /// Video hosting and upload.
    YouTube,
}
