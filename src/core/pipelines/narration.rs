//! Narration with Background Audio
//!
//! Synthesizes narration speech, pads it with a silence tail, downloads a
//! random background track, trims a random section of it to the narration
//! length, and mixes the two into one published audio artifact.

use std::path::Path;

use crate::core::editors::AudioEditor;
use crate::core::ffmpeg::MediaTool;
use crate::core::generative::{AudioSource, SpeechSynthesizer};
use crate::core::media::MediaFile;
use crate::core::staging::StagingArea;
use crate::core::CoreResult;

use super::{BackgroundOptions, NarrationOptions};

pub struct NarrationWithBackground<'a> {
    tool: &'a dyn MediaTool,
    synthesizer: &'a dyn SpeechSynthesizer,
    audio_source: &'a dyn AudioSource,
}

impl<'a> NarrationWithBackground<'a> {
    pub fn new(
        tool: &'a dyn MediaTool,
        synthesizer: &'a dyn SpeechSynthesizer,
        audio_source: &'a dyn AudioSource,
    ) -> Self {
        Self {
            tool,
            synthesizer,
            audio_source,
        }
    }

    /// Assembles the mixed narration inside `staging` and returns the
    /// staged result. The downloaded background track is an intermediate
    /// and is deleted before returning.
    pub async fn assemble(
        &self,
        staging: &StagingArea,
        narration: &NarrationOptions,
        background: &BackgroundOptions,
    ) -> CoreResult<MediaFile> {
        narration.validate()?;
        background.validate()?;

        let mut speech = self
            .synthesizer
            .synthesize(&narration.text, &staging.path_for("speech.wav"), &narration.voice)
            .await?;
        AudioEditor::new(&mut speech, self.tool)?
            .add_silence_tail(narration.silence_tail_sec)?;

        let mut track = self
            .audio_source
            .download_random(&background.urls, &staging.path_for("background.mp3"))
            .await?;

        let narration_sec = self.tool.probe_duration(speech.path())?;
        AudioEditor::new(&mut track, self.tool)?.extract_random_section(narration_sec)?;
        AudioEditor::new(&mut speech, self.tool)?
            .mix_with(&track, background.relative_volume)?;
        track.delete()?;

        tracing::info!(
            path = %speech.path().display(),
            narration_sec,
            "assembled narration with background"
        );
        Ok(speech)
    }

    /// Full recipe: staged assembly under `media_root/audio`, then unpack.
    pub async fn create(
        &self,
        media_root: &Path,
        narration: &NarrationOptions,
        background: &BackgroundOptions,
    ) -> CoreResult<MediaFile> {
        let staging = StagingArea::create(media_root.join("audio"), "audio")?;
        let mixed = self.assemble(&staging, narration, background).await?;
        staging.unpack(&mixed)
    }
}
