//! FFmpeg Integration Module
//!
//! Provides the blocking media-tool boundary the editors run their
//! operations through: trim, concat, mix, burn-in, reverse (as part of the
//! boomerang filter) and frame extraction. A non-zero subprocess exit is an
//! operation failure and aborts the enclosing editor transaction.
//!
//! The `MediaTool` trait is the seam: production code uses `FfmpegTool`
//! (system `ffmpeg`/`ffprobe`), tests substitute a fake.

mod commands;

pub use commands::FfmpegTool;

use std::path::Path;

/// FFmpeg-related error types
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("FFmpeg not found. Please install FFmpeg and ensure it is on PATH.")]
    NotFound,

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Output path error: {0}")]
    OutputError(String),

    #[error("FFprobe error: {0}")]
    ProbeError(String),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type FfmpegResult<T> = Result<T, FfmpegError>;

/// Blocking media-processing operations.
///
/// Every method writes its result to `output` and leaves `input` untouched;
/// the transactional editor points `output` at its private working copy.
pub trait MediaTool: Send + Sync {
    /// Container duration of a media file, in seconds.
    fn probe_duration(&self, input: &Path) -> FfmpegResult<f64>;

    /// Appends the time-reversed clip to itself (forward + reverse),
    /// doubling the duration and creating a seamless loop point.
    fn boomerang(&self, input: &Path, output: &Path) -> FfmpegResult<()>;

    /// Losslessly concatenates `inputs` end-to-end (no re-encoding).
    fn concat(&self, inputs: &[&Path], output: &Path) -> FfmpegResult<()>;

    /// Cuts the clip to exactly `duration_sec` seconds from the start.
    fn trim(&self, input: &Path, duration_sec: f64, output: &Path) -> FfmpegResult<()>;

    /// Muxes `audio` onto `video`, matching the shortest input.
    fn add_audio_track(&self, video: &Path, audio: &Path, output: &Path) -> FfmpegResult<()>;

    /// Appends `seconds` of silence to the end of an audio file.
    fn add_silence_tail(&self, audio: &Path, seconds: f64, output: &Path) -> FfmpegResult<()>;

    /// Extracts `[start_sec, start_sec + duration_sec)` from an audio file.
    fn extract_section(
        &self,
        audio: &Path,
        start_sec: f64,
        duration_sec: f64,
        output: &Path,
    ) -> FfmpegResult<()>;

    /// Mixes `overlay` into `base`. `relative_volume` is the overlay's
    /// weight; the base gets `2.0 - relative_volume`.
    fn mix_audio(
        &self,
        base: &Path,
        overlay: &Path,
        relative_volume: f64,
        output: &Path,
    ) -> FfmpegResult<()>;

    /// Burns a subtitle track into the video stream.
    fn burn_subtitles(&self, video: &Path, subtitles: &Path, output: &Path) -> FfmpegResult<()>;

    /// Extracts the last frame of a video as a still image.
    fn extract_frame(&self, video: &Path, output: &Path) -> FfmpegResult<()>;

    /// Renders a still image into a video clip of `duration_sec` seconds.
    fn video_from_image(&self, image: &Path, duration_sec: f64, output: &Path)
        -> FfmpegResult<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory media-tool fake for tests.
    //!
    //! Fake media files are text files whose first token is the clip
    //! duration in seconds, so duration arithmetic survives the editors'
    //! copy/rename protocol without real transcoding.

    use super::*;

    #[derive(Default)]
    pub struct FakeMediaTool {
        /// Name of the operation that should fail, if any.
        pub fail_on: Option<&'static str>,
    }

    impl FakeMediaTool {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(op: &'static str) -> Self {
            Self { fail_on: Some(op) }
        }

        fn check(&self, op: &'static str) -> FfmpegResult<()> {
            if self.fail_on == Some(op) {
                return Err(FfmpegError::ExecutionFailed(format!(
                    "injected failure in {op}"
                )));
            }
            Ok(())
        }

        fn read_duration(path: &Path) -> FfmpegResult<f64> {
            let content = std::fs::read_to_string(path)?;
            content
                .split_whitespace()
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| FfmpegError::ParseError(format!("no duration in {path:?}")))
        }

        fn write_duration(path: &Path, duration: f64, note: &str) -> FfmpegResult<()> {
            std::fs::write(path, format!("{duration} {note}"))?;
            Ok(())
        }
    }

    impl MediaTool for FakeMediaTool {
        fn probe_duration(&self, input: &Path) -> FfmpegResult<f64> {
            self.check("probe_duration")?;
            Self::read_duration(input)
        }

        fn boomerang(&self, input: &Path, output: &Path) -> FfmpegResult<()> {
            self.check("boomerang")?;
            let d = Self::read_duration(input)?;
            Self::write_duration(output, d * 2.0, "boomerang")
        }

        fn concat(&self, inputs: &[&Path], output: &Path) -> FfmpegResult<()> {
            self.check("concat")?;
            let mut total = 0.0;
            for input in inputs {
                total += Self::read_duration(input)?;
            }
            Self::write_duration(output, total, "concat")
        }

        fn trim(&self, input: &Path, duration_sec: f64, output: &Path) -> FfmpegResult<()> {
            self.check("trim")?;
            let d = Self::read_duration(input)?;
            Self::write_duration(output, duration_sec.min(d), "trim")
        }

        fn add_audio_track(&self, video: &Path, audio: &Path, output: &Path) -> FfmpegResult<()> {
            self.check("add_audio_track")?;
            let d = Self::read_duration(video)?.min(Self::read_duration(audio)?);
            Self::write_duration(output, d, "muxed")
        }

        fn add_silence_tail(&self, audio: &Path, seconds: f64, output: &Path) -> FfmpegResult<()> {
            self.check("add_silence_tail")?;
            let d = Self::read_duration(audio)?;
            Self::write_duration(output, d + seconds, "silence_tail")
        }

        fn extract_section(
            &self,
            audio: &Path,
            _start_sec: f64,
            duration_sec: f64,
            output: &Path,
        ) -> FfmpegResult<()> {
            self.check("extract_section")?;
            let d = Self::read_duration(audio)?;
            Self::write_duration(output, duration_sec.min(d), "section")
        }

        fn mix_audio(
            &self,
            base: &Path,
            overlay: &Path,
            _relative_volume: f64,
            output: &Path,
        ) -> FfmpegResult<()> {
            self.check("mix_audio")?;
            let d = Self::read_duration(base)?.max(Self::read_duration(overlay)?);
            Self::write_duration(output, d, "mixed")
        }

        fn burn_subtitles(
            &self,
            video: &Path,
            _subtitles: &Path,
            output: &Path,
        ) -> FfmpegResult<()> {
            self.check("burn_subtitles")?;
            let d = Self::read_duration(video)?;
            Self::write_duration(output, d, "subtitled")
        }

        fn extract_frame(&self, video: &Path, output: &Path) -> FfmpegResult<()> {
            self.check("extract_frame")?;
            let _ = Self::read_duration(video)?;
            std::fs::write(output, "0 frame")?;
            Ok(())
        }

        fn video_from_image(
            &self,
            image: &Path,
            duration_sec: f64,
            output: &Path,
        ) -> FfmpegResult<()> {
            self.check("video_from_image")?;
            if !image.exists() {
                return Err(FfmpegError::InvalidInput(format!("{image:?}")));
            }
            Self::write_duration(output, duration_sec, "from_image")
        }
    }

    /// Writes a fake media file whose probed duration is `duration`.
    pub fn write_media(path: &Path, duration: f64) {
        std::fs::write(path, format!("{duration} source")).unwrap();
    }
}
