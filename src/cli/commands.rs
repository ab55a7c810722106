//! Handlers for the `script`, `voice` and `run` subcommands.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{RunArgs, ScriptArgs, VoiceArgs};
use crate::audio::{AssembledAudio, AudioAssembler};
use crate::config::ScriptcastConfig;
use crate::error::{Result, ScriptcastError};
use crate::generation::{PromptAssets, ScriptGenerator, ScriptRequest};
use crate::pipeline::Pipeline;
use crate::script::{parse_script, Script};

pub async fn handle_script(
    config: &ScriptcastConfig,
    args: ScriptArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let generator = config.gemini_generator()?;
    let assets = load_assets(config).await?;
    let request = ScriptRequest::from_assets(args.topic, &assets);
    let raw = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ScriptcastError::Cancelled),
        result = generator.generate(&request) => result?,
    };
    let script = parse_script(&raw)?;

    let rendered = render_script(&script)?;
    match args.out {
        Some(path) => {
            tokio::fs::write(&path, rendered).await?;
            println!("Script written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    if !script.is_structured() {
        eprintln!("Note: the generated script has no segment timings; it will be voiced as one segment");
    }
    Ok(())
}

pub async fn handle_voice(
    config: &ScriptcastConfig,
    args: VoiceArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.script).await?;
    let script = parse_script(&raw)?.to_structured();

    let config = with_voice_override(config, args.voice_id);
    let synthesizer = config.synthesizer()?;
    let segments = synthesizer.synthesize(&script, cancel).await?;
    let audio = AudioAssembler::new().assemble(&segments)?;
    write_audio(&audio, &args.out).await
}

pub async fn handle_run(
    config: &ScriptcastConfig,
    args: RunArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let config = with_voice_override(config, args.voice_id);
    let pipeline = build_pipeline(&config).await?;
    let mut run = pipeline.run_to_audio(args.topic, cancel).await?;
    if let Some(audio) = run.take_audio() {
        write_audio(&audio, &args.out).await?;
    }
    Ok(())
}

async fn load_assets(config: &ScriptcastConfig) -> Result<PromptAssets> {
    let settings = config.settings();
    PromptAssets::load(&settings.prompt_path, &settings.samples_path).await
}

async fn build_pipeline(config: &ScriptcastConfig) -> Result<Pipeline> {
    let assets = load_assets(config).await?;
    let generator = Arc::new(config.gemini_generator()?);
    let synthesizer = config.synthesizer()?;
    Ok(Pipeline::new(generator, synthesizer).with_assets(assets))
}

fn with_voice_override(config: &ScriptcastConfig, voice_id: Option<String>) -> ScriptcastConfig {
    let mut config = config.clone();
    if let Some(voice_id) = voice_id {
        config.settings_mut().voice_id = voice_id;
    }
    config
}

/// Structured scripts as pretty JSON, freeform scripts as their text.
fn render_script(script: &Script) -> Result<String> {
    Ok(match script {
        Script::Structured(structured) => serde_json::to_string_pretty(structured)?,
        Script::Freeform(freeform) => freeform.text.clone(),
    })
}

async fn write_audio(audio: &AssembledAudio, path: &Path) -> Result<()> {
    audio.write_to(path).await?;
    println!(
        "Voiceover written to {} ({:.2}s, {} segments, {:.2}s of pauses)",
        path.display(),
        audio.duration().as_secs_f64(),
        audio.timeline().len(),
        audio.silence_duration().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{FreeformScript, Segment, StructuredScript};

    #[test]
    fn structured_script_renders_as_parseable_json() {
        let script = Script::Structured(
            StructuredScript::new("t", vec![Segment::new(0.0, 1.5, 0.5, "Hello")]).unwrap(),
        );
        let rendered = render_script(&script).unwrap();
        assert_eq!(parse_script(&rendered).unwrap(), script);
    }

    #[test]
    fn freeform_script_renders_as_text() {
        let script = Script::Freeform(FreeformScript {
            text: "Just words".to_string(),
        });
        assert_eq!(render_script(&script).unwrap(), "Just words");
    }

    #[test]
    fn voice_override_leaves_original_config() {
        let config = ScriptcastConfig::new();
        let overridden = with_voice_override(&config, Some("narrator".to_string()));
        assert_eq!(overridden.settings().voice_id, "narrator");
        assert!(config.settings().voice_id.is_empty());
    }
}
