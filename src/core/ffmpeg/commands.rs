//! Blocking FFmpeg/FFprobe invocations.
//!
//! Each operation builds an argument list (kept as a separate function so
//! the command shape is unit-testable without FFmpeg installed) and runs it
//! synchronously, mapping a non-zero exit status to
//! `FfmpegError::ExecutionFailed` carrying the tool's stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::process::configure_std_command;

use super::{FfmpegError, FfmpegResult, MediaTool};

/// System FFmpeg/FFprobe wrapper.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

impl FfmpegTool {
    /// Creates a tool from explicit binary paths.
    pub fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Verifies that both binaries respond to `-version`.
    pub fn detect() -> FfmpegResult<Self> {
        let tool = Self::default();
        for binary in [&tool.ffmpeg_path, &tool.ffprobe_path] {
            let mut cmd = Command::new(binary);
            configure_std_command(&mut cmd);
            let ok = cmd
                .arg("-version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false);
            if !ok {
                return Err(FfmpegError::NotFound);
            }
        }
        tracing::debug!(ffmpeg = %tool.ffmpeg_path.display(), "detected system ffmpeg");
        Ok(tool)
    }

    fn require_input(input: &Path) -> FfmpegResult<()> {
        if !input.exists() {
            return Err(FfmpegError::InvalidInput(format!(
                "Input file does not exist: {}",
                input.display()
            )));
        }
        Ok(())
    }

    fn run_ffmpeg(&self, args: &[String]) -> FfmpegResult<()> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        configure_std_command(&mut cmd);
        let output = cmd.args(args).output().map_err(FfmpegError::ProcessError)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FfmpegError::ExecutionFailed(stderr.into_owned()));
        }
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// =============================================================================
// Argument builders
// =============================================================================

fn boomerang_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-ss".into(),
        "0".into(),
        "-an".into(),
        "-i".into(),
        path_arg(input),
        "-filter_complex".into(),
        "[0]split[b][c];[c]reverse[r];[b][r]concat".into(),
        path_arg(output),
    ]
}

fn concat_args(list_path: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        path_arg(list_path),
        "-c".into(),
        "copy".into(),
        path_arg(output),
    ]
}

fn trim_args(input: &Path, duration_sec: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(input),
        "-t".into(),
        format!("{duration_sec:.3}"),
        "-c".into(),
        "copy".into(),
        path_arg(output),
    ]
}

fn add_audio_track_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(video),
        "-i".into(),
        path_arg(audio),
        "-map".into(),
        "0".into(),
        "-map".into(),
        "1:a".into(),
        "-c:v".into(),
        "copy".into(),
        "-shortest".into(),
        path_arg(output),
    ]
}

fn add_silence_tail_args(audio: &Path, seconds: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(audio),
        "-f".into(),
        "lavfi".into(),
        "-t".into(),
        format!("{seconds:.3}"),
        "-i".into(),
        "anullsrc=channel_layout=stereo:sample_rate=44100".into(),
        "-filter_complex".into(),
        "[0:a][1:a]concat=n=2:v=0:a=1[out]".into(),
        "-map".into(),
        "[out]".into(),
        path_arg(output),
    ]
}

fn extract_section_args(
    audio: &Path,
    start_sec: f64,
    duration_sec: f64,
    output: &Path,
) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(audio),
        "-ss".into(),
        format!("{start_sec:.3}"),
        "-t".into(),
        format!("{duration_sec:.3}"),
        "-c".into(),
        "copy".into(),
        path_arg(output),
    ]
}

fn mix_audio_args(base: &Path, overlay: &Path, relative_volume: f64, output: &Path) -> Vec<String> {
    let base_volume = 2.0 - relative_volume;
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(base),
        "-i".into(),
        path_arg(overlay),
        "-filter_complex".into(),
        format!(
            "[0:a]volume={base_volume}[a0];[1:a]volume={relative_volume}[a1];\
             [a0][a1]amix=inputs=2:duration=longest:dropout_transition=2"
        ),
        "-c:a".into(),
        "libmp3lame".into(),
        path_arg(output),
    ]
}

fn burn_subtitles_args(video: &Path, subtitles: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(video),
        "-vf".into(),
        format!("subtitles={}", subtitles.to_string_lossy()),
        "-c:a".into(),
        "copy".into(),
        path_arg(output),
    ]
}

fn extract_frame_args(video: &Path, output: &Path) -> Vec<String> {
    // Seek 3s from the end and keep updating the single output image, so
    // the written frame is the last one decoded.
    vec![
        "-y".into(),
        "-sseof".into(),
        "-3".into(),
        "-i".into(),
        path_arg(video),
        "-vsync".into(),
        "0".into(),
        "-q:v".into(),
        "0".into(),
        "-update".into(),
        "true".into(),
        path_arg(output),
    ]
}

fn video_from_image_args(image: &Path, duration_sec: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-loop".into(),
        "1".into(),
        "-i".into(),
        path_arg(image),
        "-c:v".into(),
        "libx264".into(),
        "-t".into(),
        format!("{duration_sec:.3}"),
        "-pix_fmt".into(),
        "yuv420p".into(),
        path_arg(output),
    ]
}

/// Writes the concat-demuxer list file for `inputs`.
fn write_concat_list(list_path: &Path, inputs: &[&Path]) -> FfmpegResult<()> {
    let mut content = String::new();
    for input in inputs {
        let absolute = std::fs::canonicalize(input).map_err(FfmpegError::ProcessError)?;
        content.push_str(&format!("file '{}'\n", absolute.display()));
    }
    std::fs::write(list_path, content).map_err(FfmpegError::ProcessError)
}

/// Parses FFprobe `-show_format` JSON into a duration.
fn parse_probe_duration(json_str: &str) -> FfmpegResult<f64> {
    let json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FfmpegError::ParseError(format!("Failed to parse FFprobe output: {e}")))?;
    json.get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| FfmpegError::ParseError("Missing format duration".to_string()))
}

impl MediaTool for FfmpegTool {
    fn probe_duration(&self, input: &Path) -> FfmpegResult<f64> {
        Self::require_input(input)?;
        let mut cmd = Command::new(&self.ffprobe_path);
        configure_std_command(&mut cmd);
        let output = cmd
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                &path_arg(input),
            ])
            .output()
            .map_err(FfmpegError::ProcessError)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FfmpegError::ProbeError(format!("FFprobe failed: {stderr}")));
        }
        parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
    }

    fn boomerang(&self, input: &Path, output: &Path) -> FfmpegResult<()> {
        Self::require_input(input)?;
        self.run_ffmpeg(&boomerang_args(input, output))
    }

    fn concat(&self, inputs: &[&Path], output: &Path) -> FfmpegResult<()> {
        if inputs.is_empty() {
            return Err(FfmpegError::InvalidInput(
                "concat requires at least one input".to_string(),
            ));
        }
        for input in inputs {
            Self::require_input(input)?;
        }
        let list_dir = output
            .parent()
            .ok_or_else(|| FfmpegError::OutputError(format!("{} has no parent", output.display())))?;
        let list_path = crate::core::fs::next_available_path(&list_dir.join("concat_list.txt"));

        write_concat_list(&list_path, inputs)?;
        let result = self.run_ffmpeg(&concat_args(&list_path, output));
        // The list file is scratch state owned by this call.
        let _ = std::fs::remove_file(&list_path);
        result
    }

    fn trim(&self, input: &Path, duration_sec: f64, output: &Path) -> FfmpegResult<()> {
        Self::require_input(input)?;
        self.run_ffmpeg(&trim_args(input, duration_sec, output))
    }

    fn add_audio_track(&self, video: &Path, audio: &Path, output: &Path) -> FfmpegResult<()> {
        Self::require_input(video)?;
        Self::require_input(audio)?;
        self.run_ffmpeg(&add_audio_track_args(video, audio, output))
    }

    fn add_silence_tail(&self, audio: &Path, seconds: f64, output: &Path) -> FfmpegResult<()> {
        Self::require_input(audio)?;
        self.run_ffmpeg(&add_silence_tail_args(audio, seconds, output))
    }

    fn extract_section(
        &self,
        audio: &Path,
        start_sec: f64,
        duration_sec: f64,
        output: &Path,
    ) -> FfmpegResult<()> {
        Self::require_input(audio)?;
        self.run_ffmpeg(&extract_section_args(audio, start_sec, duration_sec, output))
    }

    fn mix_audio(
        &self,
        base: &Path,
        overlay: &Path,
        relative_volume: f64,
        output: &Path,
    ) -> FfmpegResult<()> {
        Self::require_input(base)?;
        Self::require_input(overlay)?;
        self.run_ffmpeg(&mix_audio_args(base, overlay, relative_volume, output))
    }

    fn burn_subtitles(&self, video: &Path, subtitles: &Path, output: &Path) -> FfmpegResult<()> {
        Self::require_input(video)?;
        Self::require_input(subtitles)?;
        self.run_ffmpeg(&burn_subtitles_args(video, subtitles, output))
    }

    fn extract_frame(&self, video: &Path, output: &Path) -> FfmpegResult<()> {
        Self::require_input(video)?;
        self.run_ffmpeg(&extract_frame_args(video, output))
    }

    fn video_from_image(
        &self,
        image: &Path,
        duration_sec: f64,
        output: &Path,
    ) -> FfmpegResult<()> {
        Self::require_input(image)?;
        self.run_ffmpeg(&video_from_image_args(image, duration_sec, output))
    }
}
