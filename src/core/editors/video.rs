//! Video Editor
//!
//! Transactional operations on video artifacts, including the duration
//! synchronizer: boomerang, lossless repeat, and trim combine to stretch an
//! arbitrary clip to an exact target length.

use std::path::Path;

use crate::core::ffmpeg::MediaTool;
use crate::core::fs::next_available_path;
use crate::core::media::{MediaFile, MediaKind};
use crate::core::{CoreError, CoreResult};

use super::{apply_edit, require_kind};

/// Worst-case deviation of `loop_to_duration` from its target, bounded by
/// the precision of the underlying trim operation.
pub const SYNC_TOLERANCE_SEC: f64 = 0.05;

pub struct VideoEditor<'a> {
    file: &'a mut MediaFile,
    tool: &'a dyn MediaTool,
}

impl<'a> VideoEditor<'a> {
    /// Fails with `TypeMismatch` if `file` is not a video artifact.
    pub fn new(file: &'a mut MediaFile, tool: &'a dyn MediaTool) -> CoreResult<Self> {
        require_kind(file, MediaKind::Video)?;
        Ok(Self { file, tool })
    }

    /// Muxes `audio` onto the video, matching the shortest input.
    pub fn add_audio_track(&mut self, audio: &MediaFile) -> CoreResult<()> {
        require_kind(audio, MediaKind::Audio)?;
        let tool = self.tool;
        let audio_path = audio.path().to_path_buf();
        apply_edit(self.file, move |original, working| {
            tool.add_audio_track(original, &audio_path, working)
                .map_err(Into::into)
        })
    }

    /// Appends the time-reversed clip to itself, doubling the duration and
    /// creating a seamless loop point.
    pub fn apply_boomerang(&mut self) -> CoreResult<()> {
        let tool = self.tool;
        apply_edit(self.file, |original, working| {
            tool.boomerang(original, working).map_err(Into::into)
        })
    }

    /// Losslessly appends `videos` to this clip, in order.
    pub fn concat_with(&mut self, videos: &[&MediaFile]) -> CoreResult<()> {
        for video in videos {
            require_kind(video, MediaKind::Video)?;
        }
        let tool = self.tool;
        let extra: Vec<_> = videos.iter().map(|v| v.path().to_path_buf()).collect();
        apply_edit(self.file, move |original, working| {
            let mut inputs: Vec<&Path> = vec![original];
            inputs.extend(extra.iter().map(|p| p.as_path()));
            tool.concat(&inputs, working).map_err(Into::into)
        })
    }

    /// Concatenates `n` copies of the clip end-to-end.
    pub fn repeat(&mut self, n: usize) -> CoreResult<()> {
        if n == 0 {
            return Err(CoreError::InvalidArgument(
                "repeat count must be greater than 0".to_string(),
            ));
        }
        let tool = self.tool;
        apply_edit(self.file, move |original, working| {
            let inputs: Vec<&Path> = std::iter::repeat(original).take(n).collect();
            tool.concat(&inputs, working).map_err(Into::into)
        })
    }

    /// Cuts the clip to `duration_sec` seconds from the start.
    pub fn trim(&mut self, duration_sec: f64) -> CoreResult<()> {
        if duration_sec <= 0.0 {
            return Err(CoreError::InvalidArgument(
                "trim duration must be greater than 0".to_string(),
            ));
        }
        let tool = self.tool;
        apply_edit(self.file, move |original, working| {
            tool.trim(original, duration_sec, working).map_err(Into::into)
        })
    }

    /// Synchronizes the clip to exactly `target_sec` seconds (within
    /// [`SYNC_TOLERANCE_SEC`]).
    ///
    /// Boomerangs the clip to create a seamless loop of duration `2d`,
    /// repeats it `ceil(target / 2d)` times when one loop is not enough,
    /// then trims down to the target. The algorithm always over-shoots and
    /// trims; it never has to extrapolate content. Each step runs through
    /// the transactional protocol, so a failure at any point leaves the
    /// original clip intact.
    pub fn loop_to_duration(&mut self, target_sec: f64) -> CoreResult<()> {
        if target_sec <= 0.0 {
            return Err(CoreError::InvalidArgument(
                "target duration must be greater than 0 seconds".to_string(),
            ));
        }

        self.apply_boomerang()?;
        let looped = self.tool.probe_duration(self.file.path())?;
        let repeats = (target_sec / looped).ceil() as usize;
        if repeats > 1 {
            self.repeat(repeats)?;
        }
        self.trim(target_sec)?;

        tracing::info!(
            path = %self.file.path().display(),
            target_sec,
            repeats,
            "synchronized video duration"
        );
        Ok(())
    }

    /// Extracts the last frame as a sibling image artifact.
    ///
    /// Non-transactional: the source video is only read.
    pub fn extract_last_frame(&self) -> CoreResult<MediaFile> {
        let output = next_available_path(&self.file.sibling("_lastframe", "jpg"));
        self.tool.extract_frame(self.file.path(), &output)?;
        MediaFile::open(output, MediaKind::Image)
    }
}

/// Renders a still image into a video clip of `duration_sec` seconds at
/// `output_path`.
pub fn video_from_image(
    tool: &dyn MediaTool,
    image: &MediaFile,
    duration_sec: f64,
    output_path: &Path,
) -> CoreResult<MediaFile> {
    require_kind(image, MediaKind::Image)?;
    if duration_sec <= 0.0 {
        return Err(CoreError::InvalidArgument(
            "clip duration must be greater than 0".to_string(),
        ));
    }
    tool.video_from_image(image.path(), duration_sec, output_path)?;
    MediaFile::open(output_path, MediaKind::Video)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ffmpeg::fake::{write_media, FakeMediaTool};

    fn video_fixture(dir: &Path, duration: f64) -> MediaFile {
        let path = dir.join("clip.mp4");
        write_media(&path, duration);
        MediaFile::open(&path, MediaKind::Video).unwrap()
    }

    #[test]
    fn rejects_non_video_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        write_media(&path, 4.0);
        let mut audio = MediaFile::open(&path, MediaKind::Audio).unwrap();

        let tool = FakeMediaTool::new();
        assert!(matches!(
            VideoEditor::new(&mut audio, &tool),
            Err(CoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn boomerang_doubles_duration() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::new();

        VideoEditor::new(&mut video, &tool)
            .unwrap()
            .apply_boomerang()
            .unwrap();
        assert_eq!(tool.probe_duration(video.path()).unwrap(), 8.0);
    }

    #[test]
    fn loop_to_duration_four_to_ten_seconds() {
        // 4s source: boomerang -> 8s, n = ceil(10/8) = 2 -> 16s, trim -> 10s.
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::new();

        VideoEditor::new(&mut video, &tool)
            .unwrap()
            .loop_to_duration(10.0)
            .unwrap();

        let result = tool.probe_duration(video.path()).unwrap();
        assert!((result - 10.0).abs() <= SYNC_TOLERANCE_SEC);
    }

    #[test]
    fn loop_to_duration_skips_repeat_when_loop_is_long_enough() {
        // 8s source: boomerang -> 16s >= 10s target, so no repeat step.
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 8.0);
        let tool = FakeMediaTool::new();

        VideoEditor::new(&mut video, &tool)
            .unwrap()
            .loop_to_duration(10.0)
            .unwrap();
        assert!((tool.probe_duration(video.path()).unwrap() - 10.0).abs() <= SYNC_TOLERANCE_SEC);
    }

    #[test]
    fn loop_to_duration_rejects_non_positive_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::new();
        let hash_before = video.content_hash().unwrap();

        for target in [0.0, -3.0] {
            let result = VideoEditor::new(&mut video, &tool)
                .unwrap()
                .loop_to_duration(target);
            assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
        }
        assert_eq!(video.content_hash().unwrap(), hash_before);
    }

    #[test]
    fn failed_step_leaves_source_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::failing_on("boomerang");
        let hash_before = video.content_hash().unwrap();

        let result = VideoEditor::new(&mut video, &tool)
            .unwrap()
            .loop_to_duration(10.0);
        assert!(matches!(result, Err(CoreError::Ffmpeg(_))));
        assert_eq!(video.content_hash().unwrap(), hash_before);
    }

    #[test]
    fn repeat_rejects_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::new();

        let result = VideoEditor::new(&mut video, &tool).unwrap().repeat(0);
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn concat_with_appends_clips() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let other_path = dir.path().join("other.mp4");
        write_media(&other_path, 3.0);
        let other = MediaFile::open(&other_path, MediaKind::Video).unwrap();
        let tool = FakeMediaTool::new();

        VideoEditor::new(&mut video, &tool)
            .unwrap()
            .concat_with(&[&other])
            .unwrap();
        assert_eq!(tool.probe_duration(video.path()).unwrap(), 7.0);
    }

    #[test]
    fn extract_last_frame_produces_sibling_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video_fixture(dir.path(), 4.0);
        let tool = FakeMediaTool::new();

        let frame = VideoEditor::new(&mut video, &tool)
            .unwrap()
            .extract_last_frame()
            .unwrap();
        assert_eq!(frame.kind(), MediaKind::Image);
        assert!(frame.path().ends_with("clip_lastframe.jpg"));
    }

    #[test]
    fn video_from_image_creates_clip() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("still.jpg");
        write_media(&image_path, 0.0);
        let image = MediaFile::open(&image_path, MediaKind::Image).unwrap();
        let tool = FakeMediaTool::new();

        let clip =
            video_from_image(&tool, &image, 6.0, &dir.path().join("clip.mp4")).unwrap();
        assert_eq!(clip.kind(), MediaKind::Video);
        assert_eq!(tool.probe_duration(clip.path()).unwrap(), 6.0);
    }
}
