//! Stage orchestration over an explicit [`PipelineRun`].
//!
//! A run is plain owned state: independent runs share nothing mutable, and
//! every stage call takes the run it works on.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::audio::{AssembledAudio, AudioAssembler, SegmentSynthesizer};
use crate::error::{Result, ScriptcastError};
use crate::generation::{PromptAssets, ScriptGenerator, ScriptRequest};
use crate::script::{parse_script, Script};
use crate::stages::{
    AvatarRenderer, RenderedVideo, StageOutcome, UnimplementedAvatarRenderer,
    UnimplementedUploader, UploadReceipt, UploadRequest, VideoUploader,
};

/// State of one topic-to-voiceover run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    script: Option<Script>,
    audio: Option<AssembledAudio>,
    avatar: Option<StageOutcome<RenderedVideo>>,
    upload: Option<StageOutcome<UploadReceipt>>,
}

impl PipelineRun {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topic: topic.into(),
            script: None,
            audio: None,
            avatar: None,
            upload: None,
        }
    }

    /// Start from an existing script, skipping generation.
    pub fn with_script(topic: impl Into<String>, script: Script) -> Self {
        let mut run = Self::new(topic);
        run.script = Some(script);
        run
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub fn audio(&self) -> Option<&AssembledAudio> {
        self.audio.as_ref()
    }

    pub fn take_audio(&mut self) -> Option<AssembledAudio> {
        self.audio.take()
    }

    pub fn avatar(&self) -> Option<&StageOutcome<RenderedVideo>> {
        self.avatar.as_ref()
    }

    pub fn upload(&self) -> Option<&StageOutcome<UploadReceipt>> {
        self.upload.as_ref()
    }

    fn replace_script(&mut self, script: Script) -> &Script {
        self.audio = None;
        self.avatar = None;
        self.upload = None;
        self.script.insert(script)
    }

    fn replace_audio(&mut self, audio: AssembledAudio) -> &AssembledAudio {
        self.avatar = None;
        self.upload = None;
        self.audio.insert(audio)
    }
}

/// Owns the stage collaborators.
pub struct Pipeline {
    generator: Arc<dyn ScriptGenerator>,
    synthesizer: SegmentSynthesizer,
    assembler: AudioAssembler,
    avatar: Arc<dyn AvatarRenderer>,
    uploader: Arc<dyn VideoUploader>,
    assets: PromptAssets,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("synthesizer", &self.synthesizer)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline with placeholder avatar and upload stages and empty prompt assets.
    pub fn new(generator: Arc<dyn ScriptGenerator>, synthesizer: SegmentSynthesizer) -> Self {
        Self {
            generator,
            synthesizer,
            assembler: AudioAssembler::new(),
            avatar: Arc::new(UnimplementedAvatarRenderer),
            uploader: Arc::new(UnimplementedUploader),
            assets: PromptAssets::default(),
        }
    }

    pub fn with_assets(mut self, assets: PromptAssets) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_avatar_renderer(mut self, avatar: Arc<dyn AvatarRenderer>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn VideoUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    /// Generate (or regenerate) the run's script.
    ///
    /// Output that is not a structured script is kept as freeform text.
    /// Any previous audio and downstream outcomes are discarded.
    pub async fn generate_script<'r>(
        &self,
        run: &'r mut PipelineRun,
        cancel: &CancellationToken,
    ) -> Result<&'r Script> {
        if run.topic.trim().is_empty() {
            return Err(ScriptcastError::InvalidArgument(
                "Topic cannot be empty".to_string(),
            ));
        }

        let request = ScriptRequest::from_assets(run.topic.clone(), &self.assets);
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ScriptcastError::Cancelled),
            result = self.generator.generate(&request) => result?,
        };

        let script = parse_script(&raw)?;
        tracing::info!(
            run_id = %run.id,
            structured = script.is_structured(),
            "Script generated"
        );
        Ok(run.replace_script(script))
    }

    /// Synthesize and assemble the voiceover for the run's current script.
    ///
    /// Replaces any previous audio. On failure the run keeps its previous
    /// audio untouched.
    pub async fn synthesize_voice<'r>(
        &self,
        run: &'r mut PipelineRun,
        cancel: &CancellationToken,
    ) -> Result<&'r AssembledAudio> {
        let script = run
            .script
            .as_ref()
            .ok_or_else(|| ScriptcastError::InvalidState("No script to synthesize".to_string()))?
            .to_structured();

        let segments = self.synthesizer.synthesize(&script, cancel).await?;
        let audio = self.assembler.assemble(&segments)?;
        tracing::info!(
            run_id = %run.id,
            segments = audio.timeline().len(),
            duration_ms = audio.duration().as_millis() as u64,
            "Voiceover assembled"
        );
        Ok(run.replace_audio(audio))
    }

    pub async fn render_avatar<'r>(
        &self,
        run: &'r mut PipelineRun,
    ) -> Result<&'r StageOutcome<RenderedVideo>> {
        let audio = run
            .audio
            .as_ref()
            .ok_or_else(|| ScriptcastError::InvalidState("No voiceover to render".to_string()))?;
        let outcome = self.avatar.render(audio).await?;
        tracing::info!(run_id = %run.id, completed = outcome.is_completed(), "Avatar stage finished");
        Ok(run.avatar.insert(outcome))
    }

    pub async fn upload<'r>(
        &self,
        run: &'r mut PipelineRun,
        request: &UploadRequest,
    ) -> Result<&'r StageOutcome<UploadReceipt>> {
        if run.audio.is_none() {
            return Err(ScriptcastError::InvalidState(
                "Nothing to upload before the voiceover exists".to_string(),
            ));
        }
        let outcome = self.uploader.upload(request).await?;
        tracing::info!(run_id = %run.id, completed = outcome.is_completed(), "Upload stage finished");
        Ok(run.upload.insert(outcome))
    }

    /// Topic to assembled voiceover in one call.
    pub async fn run_to_audio(
        &self,
        topic: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<PipelineRun> {
        let mut run = PipelineRun::new(topic);
        tracing::info!(run_id = %run.id, topic = %run.topic, "Pipeline run started");
        self.generate_script(&mut run, cancel).await?;
        self.synthesize_voice(&mut run, cancel).await?;
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{FreeformScript, Segment, StructuredScript};

    struct Canned(&'static str);

    #[async_trait::async_trait]
    impl ScriptGenerator for Canned {
        async fn generate(&self, _request: &ScriptRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Tone;

    #[async_trait::async_trait]
    impl crate::audio::SpeechProvider for Tone {
        async fn synthesize(&self, request: &crate::audio::SpeechRequest) -> Result<Vec<u8>> {
            Ok(vec![1u8; request.text.len() * 2])
        }
    }

    fn pipeline(raw: &'static str) -> Pipeline {
        let synth = SegmentSynthesizer::new(Arc::new(Tone), "voice")
            .with_pacing(std::time::Duration::ZERO);
        Pipeline::new(Arc::new(Canned(raw)), synth)
    }

    #[tokio::test]
    async fn synthesis_requires_a_script() {
        let mut run = PipelineRun::new("bees");
        let err = pipeline("x")
            .synthesize_voice(&mut run, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptcastError::InvalidState(_)));
    }

    #[tokio::test]
    async fn avatar_requires_audio() {
        let mut run = PipelineRun::with_script(
            "bees",
            Script::Freeform(FreeformScript {
                text: "hi".to_string(),
            }),
        );
        let err = pipeline("x").render_avatar(&mut run).await.unwrap_err();
        assert!(matches!(err, ScriptcastError::InvalidState(_)));
    }

    #[tokio::test]
    async fn regenerating_clears_audio() {
        let pipeline = pipeline("plain narration");
        let cancel = CancellationToken::new();
        let mut run = PipelineRun::with_script(
            "bees",
            Script::Structured(
                StructuredScript::new("t", vec![Segment::new(0.0, 1.0, 0.0, "Hi")]).unwrap(),
            ),
        );
        pipeline.synthesize_voice(&mut run, &cancel).await.unwrap();
        pipeline.render_avatar(&mut run).await.unwrap();
        assert!(run.audio().is_some());
        assert!(run.avatar().is_some());

        let script = pipeline.generate_script(&mut run, &cancel).await.unwrap();
        assert!(!script.is_structured());
        assert!(run.audio().is_none());
        assert!(run.avatar().is_none());
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_before_generation() {
        let mut run = PipelineRun::new("   ");
        let err = pipeline("x")
            .generate_script(&mut run, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptcastError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn cancelled_generation_leaves_run_untouched() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut run = PipelineRun::new("bees");
        let err = pipeline("x")
            .generate_script(&mut run, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptcastError::Cancelled));
        assert!(run.script().is_none());
    }
}
