//! scriptcast: topic to narrated voiceover.
//!
//! A generated script is validated into timed segments, each segment is
//! voiced by a speech service in order, and the clips are joined into one
//! WAV track with the script's pauses inserted as silence. Avatar
//! rendering and upload are exposed as capability interfaces.
//!
//! # Quick Start
//!
//! ```no_run
//! use scriptcast::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> scriptcast::error::Result<()> {
//! let config = ScriptcastConfig::load(None)?;
//! let generator = std::sync::Arc::new(config.gemini_generator()?);
//! let pipeline = Pipeline::new(generator, config.synthesizer()?);
//!
//! let run = pipeline.run_to_audio("Why octopuses have three hearts", &CancellationToken::new()).await?;
//! if let Some(audio) = run.audio() {
//!     audio.write_to("voiceover.wav").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod prelude;
pub mod provider;
pub mod script;
pub mod stages;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
