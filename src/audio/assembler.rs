//! Assemble per-segment audio into one continuous WAV track.
//!
//! Each segment's samples are followed by `delay_after` seconds of digital
//! silence, rounded to the nearest frame. The gap follows every segment,
//! the last one included, so the track's length is the sum of the segment
//! audio plus the sum of the declared delays.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use super::segment::AudioSegment;
use super::types::AudioFormat;
use crate::error::{Result, ScriptcastError};
use crate::provider::Service;
use crate::script::MAX_TIMING_SECONDS;

const BITS_PER_SAMPLE: u16 = 16;

/// Where one segment landed in the assembled track.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSegment {
    /// Position of the segment in the source script.
    pub index: usize,
    pub text: String,
    /// Offset of the segment's first frame.
    pub offset: Duration,
    pub audio_frames: u64,
    pub silence_frames: u64,
}

/// The final voiceover: a 16-bit PCM WAV payload plus its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledAudio {
    wav: Vec<u8>,
    sample_rate: u32,
    channels: u16,
    total_frames: u64,
    timeline: Vec<PlacedSegment>,
}

impl AssembledAudio {
    /// WAV bytes, header included.
    pub fn bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.wav
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn timeline(&self) -> &[PlacedSegment] {
        &self.timeline
    }

    pub fn duration(&self) -> Duration {
        frames_to_duration(self.total_frames, self.sample_rate)
    }

    pub fn silence_duration(&self) -> Duration {
        let frames = self.timeline.iter().map(|p| p.silence_frames).sum();
        frames_to_duration(frames, self.sample_rate)
    }

    /// Write the WAV payload to `path`.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path.as_ref(), &self.wav).await?;
        tracing::info!(path = %path.as_ref().display(), bytes = self.wav.len(), "Wrote voiceover");
        Ok(())
    }
}

/// Concatenates synthesized segments with silence gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioAssembler;

impl AudioAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble `segments` in order.
    ///
    /// Fails with [`ScriptcastError::EmptyInput`] for an empty slice and
    /// with [`ScriptcastError::InvalidArgument`] for an unsupported format or
    /// a gap longer than [`MAX_TIMING_SECONDS`]. The output depends only on
    /// the input, so repeated calls yield identical bytes.
    pub fn assemble(&self, segments: &[AudioSegment]) -> Result<AssembledAudio> {
        let first = segments.first().ok_or(ScriptcastError::EmptyInput)?;
        first.format().validate()?;
        let sample_rate = first.format().sample_rate();
        let mut channels = None;

        let mut samples: Vec<i16> = Vec::new();
        let mut timeline = Vec::with_capacity(segments.len());
        let mut frames_so_far: u64 = 0;

        for segment in segments {
            let decoded = decode(segment)?;
            let segment_rate = segment.format().sample_rate();
            if segment_rate != sample_rate {
                return Err(ScriptcastError::InvalidArgument(format!(
                    "Segment {} is {segment_rate}Hz but the track is {sample_rate}Hz",
                    segment.index()
                )));
            }
            let track_channels = *channels.get_or_insert(decoded.channels);
            if decoded.channels != track_channels {
                return Err(ScriptcastError::InvalidArgument(format!(
                    "Segment {} has {} channels but the track has {track_channels}",
                    segment.index(),
                    decoded.channels
                )));
            }

            let delay = segment.delay_after();
            if delay > MAX_TIMING_SECONDS {
                return Err(ScriptcastError::InvalidArgument(format!(
                    "Segment {} asks for {delay}s of silence, the limit is {MAX_TIMING_SECONDS}s",
                    segment.index()
                )));
            }
            let audio_frames = (decoded.samples.len() / track_channels as usize) as u64;
            let silence_frames = silence_frames(delay, sample_rate);

            timeline.push(PlacedSegment {
                index: segment.index(),
                text: segment.text().to_string(),
                offset: frames_to_duration(frames_so_far, sample_rate),
                audio_frames,
                silence_frames,
            });

            let silence_samples = usize::try_from(silence_frames)
                .ok()
                .and_then(|frames| frames.checked_mul(usize::from(track_channels)))
                .ok_or_else(|| too_long(segment))?;
            samples
                .try_reserve(decoded.samples.len() + silence_samples)
                .map_err(|_| too_long(segment))?;
            samples.extend_from_slice(&decoded.samples);
            samples.resize(samples.len() + silence_samples, 0);
            frames_so_far += audio_frames + silence_frames;
        }

        let channels = channels.unwrap_or(1);
        let wav = encode_wav(&samples, sample_rate, channels)?;

        tracing::info!(
            segments = timeline.len(),
            frames = frames_so_far,
            sample_rate,
            "Assembled voiceover"
        );

        Ok(AssembledAudio {
            wav,
            sample_rate,
            channels,
            total_frames: frames_so_far,
            timeline,
        })
    }
}

/// Number of silent frames for a gap of `seconds`.
pub fn silence_frames(seconds: f64, sample_rate: u32) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * f64::from(sample_rate)).round() as u64
}

fn frames_to_duration(frames: u64, sample_rate: u32) -> Duration {
    Duration::from_secs_f64(frames as f64 / f64::from(sample_rate))
}

struct Decoded {
    samples: Vec<i16>,
    channels: u16,
}

fn decode(segment: &AudioSegment) -> Result<Decoded> {
    let audio = segment.audio();
    match segment.format() {
        AudioFormat::Pcm16 { .. } => {
            if audio.len() % 2 != 0 {
                return Err(malformed(segment, "PCM payload has an odd byte count"));
            }
            let samples = audio
                .chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            Ok(Decoded {
                samples,
                channels: 1,
            })
        }
        AudioFormat::Wav { sample_rate } => {
            let reader = hound::WavReader::new(Cursor::new(audio))
                .map_err(|e| malformed(segment, &format!("unreadable WAV payload: {e}")))?;
            let spec = reader.spec();
            if spec.sample_format != hound::SampleFormat::Int
                || spec.bits_per_sample != BITS_PER_SAMPLE
            {
                return Err(malformed(
                    segment,
                    &format!(
                        "expected 16-bit integer WAV, got {}-bit {:?}",
                        spec.bits_per_sample, spec.sample_format
                    ),
                ));
            }
            if spec.sample_rate != sample_rate {
                return Err(malformed(
                    segment,
                    &format!(
                        "WAV is {}Hz but {sample_rate}Hz was requested",
                        spec.sample_rate
                    ),
                ));
            }
            let samples = reader
                .into_samples::<i16>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| malformed(segment, &format!("truncated WAV payload: {e}")))?;
            Ok(Decoded {
                samples,
                channels: spec.channels,
            })
        }
    }
}

fn too_long(segment: &AudioSegment) -> ScriptcastError {
    ScriptcastError::InvalidArgument(format!(
        "Segment {} does not fit in the assembled track",
        segment.index()
    ))
}

fn malformed(segment: &AudioSegment, message: &str) -> ScriptcastError {
    ScriptcastError::malformed(
        Service::ElevenLabs,
        format!("segment {}: {message}", segment.index()),
    )
}

fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
