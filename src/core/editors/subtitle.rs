//! Subtitle Editor
//!
//! Renders styled subtitle variants of a video: the narration text is timed
//! proportionally over the speaking window, written to one temporary ASS
//! track per configured screen position, and each track is burned into a
//! fresh copy of the source video through the transactional edit protocol.

use serde::{Deserialize, Serialize};

use crate::core::captions::style::{render_ass, ScreenPosition, SubtitleStyle};
use crate::core::captions::timed_entries;
use crate::core::ffmpeg::MediaTool;
use crate::core::fs::next_available_path;
use crate::core::media::{MediaFile, MediaKind};
use crate::core::CoreResult;

use super::{apply_edit, require_kind};

/// Configuration for subtitle rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleOptions {
    /// Screen positions to render; one subtitled video per position.
    pub positions: Vec<ScreenPosition>,
    /// Shared font/color/margin attributes.
    pub style: SubtitleStyle,
    /// Trailing silence excluded from the speaking window.
    pub silence_tail_sec: f64,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            positions: vec![
                ScreenPosition::BottomCenter,
                ScreenPosition::TopCenter,
                ScreenPosition::MiddleCenter,
            ],
            style: SubtitleStyle::default(),
            silence_tail_sec: 5.0,
        }
    }
}

/// Burns timed, styled subtitles into copies of a source video.
pub struct SubtitleEditor<'a> {
    file: &'a MediaFile,
    tool: &'a dyn MediaTool,
}

impl<'a> SubtitleEditor<'a> {
    /// Fails with `TypeMismatch` if `file` is not a video artifact.
    pub fn new(file: &'a MediaFile, tool: &'a dyn MediaTool) -> CoreResult<Self> {
        require_kind(file, MediaKind::Video)?;
        Ok(Self { file, tool })
    }

    /// Renders one subtitled video per configured position.
    ///
    /// All variants share identical entry timings and differ only in
    /// on-screen placement. Temporary ASS tracks are deleted whether or not
    /// their burn-in step succeeds; the source video is never mutated.
    pub fn render_variants(
        &self,
        text: &str,
        options: &SubtitleOptions,
    ) -> CoreResult<Vec<MediaFile>> {
        let total = self.tool.probe_duration(self.file.path())?;
        let window = total - options.silence_tail_sec;
        let entries = timed_entries(text, window)?;

        let mut variants = Vec::with_capacity(options.positions.len());
        for position in &options.positions {
            let track = render_ass(&entries, &options.style, *position);
            let track_path =
                next_available_path(&self.file.sibling(&format!("_{position}"), "ass"));
            std::fs::write(&track_path, track)?;

            let burned = self.burn_variant(&track_path, *position);
            let _ = std::fs::remove_file(&track_path);
            let variant = burned?;

            tracing::info!(
                position = %position,
                path = %variant.path().display(),
                "rendered subtitled variant"
            );
            variants.push(variant);
        }
        Ok(variants)
    }

    fn burn_variant(
        &self,
        track_path: &std::path::Path,
        position: ScreenPosition,
    ) -> CoreResult<MediaFile> {
        let output_path = next_available_path(
            &self
                .file
                .sibling(&format!("_{position}"), &self.file.extension()),
        );
        let mut copy = self.file.copy_to(&output_path)?;

        let tool = self.tool;
        let result = apply_edit(&mut copy, |original, working| {
            tool.burn_subtitles(original, track_path, working)
                .map_err(Into::into)
        });
        match result {
            Ok(()) => Ok(copy),
            Err(error) => {
                // The half-made variant is scratch state owned by this call.
                let _ = copy.delete();
                Err(error)
            }
        }
    }
}
