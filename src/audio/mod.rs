//! Audio capabilities: speech synthesis, segmented batches, and assembly.

pub mod assembler;
#[cfg(feature = "elevenlabs")]
pub mod elevenlabs;
mod segment;
pub mod synthesizer;
pub mod tts;
pub mod types;

pub use assembler::{AssembledAudio, AudioAssembler, PlacedSegment};
#[cfg(feature = "elevenlabs")]
pub use elevenlabs::ElevenLabsSpeechProvider;
pub use segment::AudioSegment;
pub use synthesizer::SegmentSynthesizer;
pub use tts::SpeechProvider;
pub use types::*;

/// ElevenLabs model used when none is configured.
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";
