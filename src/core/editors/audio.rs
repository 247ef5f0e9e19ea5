//! Audio Editor
//!
//! Transactional operations on audio artifacts: silence tails, section
//! extraction, and background mixing.

use rand::Rng;

use crate::core::ffmpeg::MediaTool;
use crate::core::media::{MediaFile, MediaKind};
use crate::core::{CoreError, CoreResult};

use super::{apply_edit, require_kind};

pub struct AudioEditor<'a> {
    file: &'a mut MediaFile,
    tool: &'a dyn MediaTool,
}

impl<'a> AudioEditor<'a> {
    /// Fails with `TypeMismatch` if `file` is not an audio artifact.
    pub fn new(file: &'a mut MediaFile, tool: &'a dyn MediaTool) -> CoreResult<Self> {
        require_kind(file, MediaKind::Audio)?;
        Ok(Self { file, tool })
    }

    /// Appends `seconds` of silence to the end of the track.
    pub fn add_silence_tail(&mut self, seconds: f64) -> CoreResult<()> {
        if seconds < 0.0 {
            return Err(CoreError::InvalidArgument(
                "silence tail must not be negative".to_string(),
            ));
        }
        let tool = self.tool;
        apply_edit(self.file, |original, working| {
            tool.add_silence_tail(original, seconds, working)
                .map_err(Into::into)
        })
    }

    /// Keeps only `[start_sec, start_sec + duration_sec)` of the track.
    pub fn extract_section(&mut self, start_sec: f64, duration_sec: f64) -> CoreResult<()> {
        if start_sec < 0.0 || duration_sec <= 0.0 {
            return Err(CoreError::InvalidArgument(
                "section start must be >= 0 and duration > 0".to_string(),
            ));
        }
        let tool = self.tool;
        apply_edit(self.file, |original, working| {
            tool.extract_section(original, start_sec, duration_sec, working)
                .map_err(Into::into)
        })
    }

    /// Keeps a randomly positioned section of `duration_sec` seconds.
    pub fn extract_random_section(&mut self, duration_sec: f64) -> CoreResult<()> {
        let total = self.tool.probe_duration(self.file.path())?;
        if duration_sec > total {
            return Err(CoreError::InvalidArgument(format!(
                "requested section ({duration_sec}s) is longer than the track ({total}s)"
            )));
        }
        let start = rand::thread_rng().gen_range(0.0..=total - duration_sec);
        self.extract_section(start, duration_sec)
    }

    /// Mixes `overlay` into this track. `relative_volume` is the overlay's
    /// weight in `0.0..=2.0`; the base track gets `2.0 - relative_volume`.
    pub fn mix_with(&mut self, overlay: &MediaFile, relative_volume: f64) -> CoreResult<()> {
        require_kind(overlay, MediaKind::Audio)?;
        if !(0.0..=2.0).contains(&relative_volume) {
            return Err(CoreError::InvalidArgument(
                "relative_volume must be between 0 and 2".to_string(),
            ));
        }
        let tool = self.tool;
        let overlay_path = overlay.path().to_path_buf();
        apply_edit(self.file, move |original, working| {
            tool.mix_audio(original, &overlay_path, relative_volume, working)
                .map_err(Into::into)
        })
    }
}
