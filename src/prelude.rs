//! Convenience re-exports for common use.

pub use crate::audio::{
    AssembledAudio, AudioAssembler, AudioFormat, SegmentSynthesizer, SpeechProvider,
    SpeechRequest, VoiceSettings,
};
pub use crate::config::ScriptcastConfig;
pub use crate::error::{Result, ScriptcastError};
pub use crate::generation::{PromptAssets, ScriptGenerator, ScriptRequest};
pub use crate::pipeline::{Pipeline, PipelineRun};
pub use crate::provider::Service;
pub use crate::script::{parse_script, Script, Segment, StructuredScript};
pub use crate::stages::{StageOutcome, UploadMetadata};
