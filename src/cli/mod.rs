//! CLI entry point for scriptcast.

pub mod commands;
pub mod errors;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Topic to narrated voiceover
#[derive(Parser, Debug)]
#[command(name = "scriptcast", version, about = "Generate and voice short-form video scripts")]
pub struct Cli {
    /// Config file (defaults to ~/.scriptcast/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a script for a topic
    Script(ScriptArgs),
    /// Synthesize a voiceover from a script file
    Voice(VoiceArgs),
    /// Generate a script and its voiceover
    Run(RunArgs),
}

/// Arguments for `scriptcast script`.
#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Video topic
    #[arg(short, long)]
    pub topic: String,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `scriptcast voice`.
#[derive(Parser, Debug)]
pub struct VoiceArgs {
    /// Script file (structured JSON or plain text)
    #[arg(short, long)]
    pub script: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    pub out: PathBuf,

    /// Override the configured voice
    #[arg(long)]
    pub voice_id: Option<String>,
}

/// Arguments for `scriptcast run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Video topic
    #[arg(short, long)]
    pub topic: String,

    /// Output WAV file
    #[arg(short, long)]
    pub out: PathBuf,

    /// Override the configured voice
    #[arg(long)]
    pub voice_id: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
