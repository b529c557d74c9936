// Facade tying the collaborators together: model management, audio decode,
// transcription and the transcript analysis live in their own modules.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::analysis::{analyze, render_report};
use crate::audio::load_audio_file;
use crate::transcription::{ensure_model, transcribe};

/// Runs one analysis at a time on the caller's thread. The Whisper context
/// is loaded lazily on the first run and cached until the model changes.
pub struct AnalyzerCore {
    model_path: PathBuf,
    language: Option<String>,
    ctx: Option<Arc<WhisperContext>>,
}

impl AnalyzerCore {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            language: None,
            ctx: None,
        }
    }

    pub fn set_model_path(&mut self, path: PathBuf) {
        if path != self.model_path {
            self.model_path = path;
            // Drop the cached context; the next run reloads it
            self.ctx = None;
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    // Language hint (None for auto-detect)
    pub fn set_language(&mut self, lang: Option<&str>) {
        self.language = lang.map(|s| s.to_string());
    }

    /// Transcribe `audio_path` and report occurrence timestamps and gaps for
    /// each target word. Collaborator failures propagate to the caller.
    pub fn run(
        &mut self,
        audio_path: &Path,
        targets: &[String],
        threshold: Option<u8>,
    ) -> Result<String> {
        let ctx = self.ensure_context()?;

        let decode_start = Instant::now();
        let pcm = load_audio_file(audio_path)?;
        tracing::info!("Audio decode took {:.2}s", decode_start.elapsed().as_secs_f32());

        let mut state = ctx.create_state().context("create Whisper state")?;
        let segments = transcribe(&mut state, &pcm, self.language.as_deref())?;

        let stats = analyze(&segments, targets, threshold);
        Ok(render_report(&stats))
    }

    fn ensure_context(&mut self) -> Result<Arc<WhisperContext>> {
        if let Some(ctx) = &self.ctx {
            return Ok(ctx.clone());
        }

        whisper_rs::install_logging_hooks();
        ensure_model(&self.model_path).context("download Whisper model")?;

        let model_path_str = self
            .model_path
            .to_str()
            .ok_or_else(|| anyhow!("invalid model path (non-UTF-8)"))?;
        let load_start = Instant::now();
        let ctx =
            WhisperContext::new_with_params(model_path_str, WhisperContextParameters::default())
                .with_context(|| format!("load Whisper model: {}", self.model_path.display()))?;
        tracing::info!(
            "Loaded model {} in {:.2}s",
            self.model_path.display(),
            load_start.elapsed().as_secs_f32()
        );

        let ctx = Arc::new(ctx);
        self.ctx = Some(ctx.clone());
        Ok(ctx)
    }
}
