//! Shared test helpers and mock speech provider.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use scriptcast::audio::{SpeechProvider, SpeechRequest};
use scriptcast::error::ScriptcastError;
use scriptcast::provider::Service;

/// Frames of audio returned per request.
pub const FRAMES_PER_REQUEST: usize = 100;

/// A mock speech provider that records every request in order.
///
/// Each response is `FRAMES_PER_REQUEST` mono PCM16 frames whose sample
/// value is the 1-based request number, so assembled output can be traced
/// back to the request that produced it.
#[derive(Default)]
pub struct MockSpeechProvider {
    requests: Mutex<Vec<SpeechRequest>>,
    fail_on_request: Option<usize>,
    fail_status: u16,
}

impl MockSpeechProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th request (0-based) with an upstream error.
    pub fn failing_at(n: usize, status: u16) -> Self {
        Self {
            fail_on_request: Some(n),
            fail_status: status,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.text).collect()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ScriptcastError> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        if self.fail_on_request == Some(n) {
            return Err(ScriptcastError::upstream(
                Service::ElevenLabs,
                self.fail_status,
                "mock failure",
            ));
        }
        Ok(pcm_frames(FRAMES_PER_REQUEST, (n + 1) as i16))
    }
}

/// A speech provider whose response for `stall_on` never arrives.
///
/// `started` is notified once that request is in flight.
pub struct StallingSpeechProvider {
    texts: Mutex<Vec<String>>,
    stall_on: String,
    pub started: Notify,
}

impl StallingSpeechProvider {
    pub fn new(stall_on: &str) -> Self {
        Self {
            texts: Mutex::new(Vec::new()),
            stall_on: stall_on.to_string(),
            started: Notify::new(),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for StallingSpeechProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ScriptcastError> {
        self.texts.lock().unwrap().push(request.text.clone());
        if request.text == self.stall_on {
            self.started.notify_one();
            std::future::pending::<()>().await;
        }
        Ok(pcm_frames(FRAMES_PER_REQUEST, 1))
    }
}

/// `frames` little-endian PCM16 samples of `value`.
pub fn pcm_frames(frames: usize, value: i16) -> Vec<u8> {
    std::iter::repeat(value.to_le_bytes())
        .take(frames)
        .flatten()
        .collect()
}

/// Decode a mono 16-bit WAV into its samples.
pub fn wav_samples(wav: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}
