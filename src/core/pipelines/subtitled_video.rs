//! Subtitled Narrated Video
//!
//! Builds a narrated video, renders one subtitled copy per configured
//! screen position, discards the unsubtitled intermediate, and publishes
//! every variant.

use std::path::Path;

use crate::core::editors::{SubtitleEditor, SubtitleOptions};
use crate::core::ffmpeg::MediaTool;
use crate::core::generative::{AudioSource, ImageGenerator, SpeechSynthesizer};
use crate::core::media::MediaFile;
use crate::core::staging::StagingArea;
use crate::core::CoreResult;

use super::{BackgroundOptions, ImageVideoOptions, NarrationOptions, NarratedVideo};

pub struct SubtitledNarratedVideo<'a> {
    tool: &'a dyn MediaTool,
    synthesizer: &'a dyn SpeechSynthesizer,
    audio_source: &'a dyn AudioSource,
    image_generator: &'a dyn ImageGenerator,
}

impl<'a> SubtitledNarratedVideo<'a> {
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

    /// Full recipe: narrated clip, one subtitled variant per position,
    /// unpack all variants. The subtitle window excludes
    /// `subtitles.silence_tail_sec`, which should match the narration's
    /// silence tail so captions end when the speech does.
    pub async fn create(
        &self,
        media_root: &Path,
        narration: &NarrationOptions,
        background: &BackgroundOptions,
        image_video: &ImageVideoOptions,
        subtitles: &SubtitleOptions,
    ) -> CoreResult<(Vec<MediaFile>, Option<f64>)> {
        let staging = StagingArea::create(media_root.join("video"), "video")?;

        let narrated_stage = NarratedVideo::new(
            self.tool,
            self.synthesizer,
            self.audio_source,
            self.image_generator,
        );
        let (video, cost) = narrated_stage
            .assemble(&staging, narration, background, image_video)
            .await?;

        let variants = SubtitleEditor::new(&video, self.tool)?
            .render_variants(&narration.text, subtitles)?;
        video.delete()?;

        let refs: Vec<&MediaFile> = variants.iter().collect();
        let published = staging.unpack_all(&refs)?;
        Ok((published, cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ffmpeg::fake::FakeMediaTool;
    use crate::core::generative::mocks::{
        MockAudioSource, MockImageGenerator, MockSpeechSynthesizer,
    };
    use crate::core::media::MediaKind;

    #[tokio::test]
    async fn publishes_one_variant_per_position() {
        let root = tempfile::tempdir().unwrap();
        let tool = FakeMediaTool::new();
        let synthesizer = MockSpeechSynthesizer { speech_sec: 7.0 };
        let audio_source = MockAudioSource { track_sec: 60.0 };
        let generator = MockImageGenerator;

        let pipeline =
            SubtitledNarratedVideo::new(&tool, &synthesizer, &audio_source, &generator);
        let subtitles = SubtitleOptions::default();

        let (published, _cost) = pipeline
            .create(
                root.path(),
                &NarrationOptions::new("A first sentence. A second sentence."),
                &BackgroundOptions::new(vec!["https://example.com/a.mp3".to_string()]),
                &ImageVideoOptions::new("a skyline at dusk"),
                &subtitles,
            )
            .await
            .unwrap();

        assert_eq!(published.len(), subtitles.positions.len());
        for variant in &published {
            assert!(variant.exists());
            assert_eq!(variant.kind(), MediaKind::Video);
            assert_eq!(variant.dir(), root.path().join("video"));
        }
        // Staging collapsed; the unsubtitled intermediate never escapes.
        assert!(!root.path().join("video/video").exists());
        assert!(!root.path().join("video/clip.mp4").exists());
    }
}
