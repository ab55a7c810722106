//! Narration scripts: the structured segment schema and its freeform fallback.
//!
//! [`parse_script`] turns the raw text returned by the script-generation
//! service into a [`Script`]. Output that does not match the structured
//! schema is kept as [`FreeformScript`]; only a structurally valid script
//! whose timing is inconsistent is rejected.

pub mod fence;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptcastError};

pub use fence::strip_code_fences;

/// Upper bound, in seconds, for any timing field and for the summed
/// `delay_after` of a script.
pub const MAX_TIMING_SECONDS: f64 = 3600.0;

/// One timed unit of narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Seconds. Informational; not checked against synthesized audio.
    pub start_time: f64,
    /// Seconds, `>= start_time`.
    pub end_time: f64,
    /// Seconds of silence appended after this segment's audio.
    #[serde(default)]
    pub delay_after: f64,
    /// Exact text sent to speech synthesis.
    pub text: String,
}

impl Segment {
    pub fn new(start_time: f64, end_time: f64, delay_after: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            delay_after,
            text: text.into(),
        }
    }

    /// Whether synthesis should skip this segment.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn validate(&self, index: usize) -> Result<()> {
        let fields = [
            ("start_time", self.start_time),
            ("end_time", self.end_time),
            ("delay_after", self.delay_after),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ScriptcastError::Validation {
                    index,
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
            if value > MAX_TIMING_SECONDS {
                return Err(ScriptcastError::Validation {
                    index,
                    message: format!("{name} {value} exceeds {MAX_TIMING_SECONDS} seconds"),
                });
            }
        }
        if self.end_time < self.start_time {
            return Err(ScriptcastError::Validation {
                index,
                message: format!(
                    "end_time {} is before start_time {}",
                    self.end_time, self.start_time
                ),
            });
        }
        Ok(())
    }
}

/// A script that conforms to the title + segments schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredScript {
    pub title: String,
    pub segments: Vec<Segment>,
}

impl StructuredScript {
    /// Build a validated structured script.
    pub fn new(title: impl Into<String>, segments: Vec<Segment>) -> Result<Self> {
        let script = Self {
            title: title.into(),
            segments,
        };
        script.validate()?;
        Ok(script)
    }

    /// Wrap freeform text as a single untimed segment with no trailing gap.
    pub fn from_freeform(script: &FreeformScript) -> Self {
        Self {
            title: String::new(),
            segments: vec![Segment::new(0.0, 0.0, 0.0, script.text.clone())],
        }
    }

    /// Sum of the declared `delay_after` gaps.
    pub fn total_delay(&self) -> f64 {
        self.segments.iter().map(|s| s.delay_after).sum()
    }

    pub fn validate(&self) -> Result<()> {
        let mut total_delay = 0.0;
        for (index, segment) in self.segments.iter().enumerate() {
            segment.validate(index)?;
            total_delay += segment.delay_after;
            if total_delay > MAX_TIMING_SECONDS {
                return Err(ScriptcastError::Validation {
                    index,
                    message: format!(
                        "total delay_after {total_delay} exceeds {MAX_TIMING_SECONDS} seconds"
                    ),
                });
            }
        }
        for (index, pair) in self.segments.windows(2).enumerate() {
            if pair[1].start_time < pair[0].end_time {
                tracing::warn!(
                    segment = index + 1,
                    start_time = pair[1].start_time,
                    previous_end_time = pair[0].end_time,
                    "Segment overlaps the previous one"
                );
            }
        }
        Ok(())
    }
}

/// Generation output that did not parse as a [`StructuredScript`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeformScript {
    pub text: String,
}

/// Result of validating a generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Script {
    Structured(StructuredScript),
    Freeform(FreeformScript),
}

impl Script {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// The structured form used for synthesis; freeform text becomes one segment.
    pub fn to_structured(&self) -> StructuredScript {
        match self {
            Self::Structured(script) => script.clone(),
            Self::Freeform(script) => StructuredScript::from_freeform(script),
        }
    }
}

/// Validate raw generation output into a [`Script`].
///
/// Fenced blocks are unwrapped before parsing. Any schema mismatch,
/// including a single segment without `text`, falls back to
/// [`Script::Freeform`] holding `raw` unchanged. A schema-valid script with
/// negative or inverted timing is a [`ScriptcastError::Validation`].
pub fn parse_script(raw: &str) -> Result<Script> {
    let candidate = strip_code_fences(raw);
    match serde_json::from_str::<StructuredScript>(candidate) {
        Ok(script) => {
            script.validate()?;
            tracing::debug!(
                title = %script.title,
                segments = script.segments.len(),
                "Parsed structured script"
            );
            Ok(Script::Structured(script))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Script is not structured, using freeform text");
            Ok(Script::Freeform(FreeformScript {
                text: raw.to_string(),
            }))
        }
    }
}
