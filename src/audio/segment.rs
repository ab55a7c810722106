use super::types::AudioFormat;
use crate::script::Segment;

/// A script segment paired with its synthesized audio.
///
/// The payload is owned and never mutated after synthesis; fields are
/// read through accessors only.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    index: usize,
    text: String,
    start_time: f64,
    end_time: f64,
    delay_after: f64,
    format: AudioFormat,
    audio: Vec<u8>,
}

impl AudioSegment {
    /// `index` is the segment's position in the source script.
    pub fn new(index: usize, segment: &Segment, format: AudioFormat, audio: Vec<u8>) -> Self {
        Self {
            index,
            text: segment.text.clone(),
            start_time: segment.start_time,
            end_time: segment.end_time,
            delay_after: segment.delay_after,
            format,
            audio,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn delay_after(&self) -> f64 {
        self.delay_after
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }
}
