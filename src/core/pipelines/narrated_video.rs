//! Narrated Video
//!
//! Generates a base image from a prompt, renders it to a short clip,
//! stretches the clip to the narration length, and muxes the mixed
//! narration onto it. The image-generation call is the one bounded wait in
//! the engine; expiry surfaces as a timeout failure.

use std::path::Path;

use crate::core::editors::{video_from_image, VideoEditor};
use crate::core::ffmpeg::MediaTool;
use crate::core::generative::{AudioSource, ImageGenerator, SpeechSynthesizer};
use crate::core::media::MediaFile;
use crate::core::staging::StagingArea;
use crate::core::{CoreError, CoreResult};

use super::{BackgroundOptions, ImageVideoOptions, NarrationOptions, NarrationWithBackground};

pub struct NarratedVideo<'a> {
    tool: &'a dyn MediaTool,
    synthesizer: &'a dyn SpeechSynthesizer,
    audio_source: &'a dyn AudioSource,
    image_generator: &'a dyn ImageGenerator,
}

impl<'a> NarratedVideo<'a> {
    pub fn new(
        tool: &'a dyn MediaTool,
        synthesizer: &'a dyn SpeechSynthesizer,
        audio_source: &'a dyn AudioSource,
        image_generator: &'a dyn ImageGenerator,
    ) -> Self {
        Self {
            tool,
            synthesizer,
            audio_source,
            image_generator,
        }
    }

    /// Assembles the narrated clip inside `staging`; returns the staged
    /// result and the generation cost when the provider reports one.
    pub async fn assemble(
        &self,
        staging: &StagingArea,
        narration: &NarrationOptions,
        background: &BackgroundOptions,
        image_video: &ImageVideoOptions,
    ) -> CoreResult<(MediaFile, Option<f64>)> {
        image_video.validate()?;

        let narration_stage =
            NarrationWithBackground::new(self.tool, self.synthesizer, self.audio_source);
        let narration_audio = narration_stage
            .assemble(staging, narration, background)
            .await?;
        let narration_sec = self.tool.probe_duration(narration_audio.path())?;

        let (image, cost) = tokio::time::timeout(
            image_video.timeout,
            self.image_generator.create(
                &image_video.prompt,
                &staging.path_for("frame.jpg"),
                &image_video.generation,
            ),
        )
        .await
        .map_err(|_| {
            CoreError::Timeout(format!(
                "image generation exceeded {}s",
                image_video.timeout.as_secs()
            ))
        })??;

        let mut clip = video_from_image(
            self.tool,
            &image,
            image_video.base_clip_sec,
            &staging.path_for("clip.mp4"),
        )?;
        image.delete()?;

        let mut editor = VideoEditor::new(&mut clip, self.tool)?;
        editor.loop_to_duration(narration_sec)?;
        editor.add_audio_track(&narration_audio)?;
        narration_audio.delete()?;

        tracing::info!(
            path = %clip.path().display(),
            narration_sec,
            "assembled narrated video"
        );
        Ok((clip, cost))
    }

    /// Full recipe: staged assembly under `media_root/video`, then unpack.
    pub async fn create(
        &self,
        media_root: &Path,
        narration: &NarrationOptions,
        background: &BackgroundOptions,
        image_video: &ImageVideoOptions,
    ) -> CoreResult<(MediaFile, Option<f64>)> {
        let staging = StagingArea::create(media_root.join("video"), "video")?;
        let (clip, cost) = self
            .assemble(&staging, narration, background, image_video)
            .await?;
        Ok((staging.unpack(&clip)?, cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ffmpeg::fake::FakeMediaTool;
    use crate::core::generative::mocks::{
        MockAudioSource, MockImageGenerator, MockSpeechSynthesizer,
    };
    use crate::core::generative::GenerationOptions;
    use crate::core::media::MediaKind;
    use async_trait::async_trait;
    use std::time::Duration;

    fn narration() -> NarrationOptions {
        NarrationOptions::new("A first sentence. A second sentence.")
    }

    fn background() -> BackgroundOptions {
        BackgroundOptions::new(vec!["https://example.com/a.mp3".to_string()])
    }

    #[tokio::test]
    async fn create_publishes_clip_matching_narration_length() {
        let root = tempfile::tempdir().unwrap();
        let tool = FakeMediaTool::new();
        let synthesizer = MockSpeechSynthesizer { speech_sec: 7.0 };
        let audio_source = MockAudioSource { track_sec: 60.0 };
        let generator = MockImageGenerator;

        let pipeline = NarratedVideo::new(&tool, &synthesizer, &audio_source, &generator);
        let (published, cost) = pipeline
            .create(
                root.path(),
                &narration(),
                &background(),
                &ImageVideoOptions::new("a skyline at dusk"),
            )
            .await
            .unwrap();

        // Narration = 7s speech + 5s silence tail; the clip is synchronized
        // to it.
        assert_eq!(tool.probe_duration(published.path()).unwrap(), 12.0);
        assert_eq!(published.kind(), MediaKind::Video);
        assert_eq!(published.dir(), root.path().join("video"));
        assert!(cost.is_none());
        // Staging collapsed.
        assert!(!root.path().join("video/video").exists());
    }

    struct StalledImageGenerator;

    #[async_trait]
    impl ImageGenerator for StalledImageGenerator {
        async fn create(
            &self,
            _prompt: &str,
            _output_path: &std::path::Path,
            _options: &GenerationOptions,
        ) -> CoreResult<(MediaFile, Option<f64>)> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("the bounded wait expires first")
        }
    }

    #[tokio::test]
    async fn stalled_generation_surfaces_as_timeout() {
        let root = tempfile::tempdir().unwrap();
        let tool = FakeMediaTool::new();
        let synthesizer = MockSpeechSynthesizer { speech_sec: 7.0 };
        let audio_source = MockAudioSource { track_sec: 60.0 };
        let generator = StalledImageGenerator;

        let pipeline = NarratedVideo::new(&tool, &synthesizer, &audio_source, &generator);
        let mut options = ImageVideoOptions::new("a skyline at dusk");
        options.timeout = Duration::from_millis(20);

        let result = pipeline
            .create(root.path(), &narration(), &background(), &options)
            .await;
        assert!(matches!(result, Err(CoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let tool = FakeMediaTool::new();
        let synthesizer = MockSpeechSynthesizer { speech_sec: 7.0 };
        let audio_source = MockAudioSource { track_sec: 60.0 };
        let generator = MockImageGenerator;

        let pipeline = NarratedVideo::new(&tool, &synthesizer, &audio_source, &generator);
        let result = pipeline
            .create(
                root.path(),
                &narration(),
                &background(),
                &ImageVideoOptions::new(""),
            )
            .await;
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }
}
