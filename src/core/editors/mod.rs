//! Transactional Editors
//!
//! An editor applies an operation to a `MediaFile` through a scoped working
//! copy: the operation writes its result to a private duplicate, which
//! atomically supersedes the original on success and is discarded on
//! failure. The original artifact is externally observable in exactly two
//! states: pre-edit or fully post-edit.
//!
//! Editors are constructed against a required artifact kind; a mismatch is
//! rejected with `CoreError::TypeMismatch` before any I/O.

mod audio;
mod subtitle;
mod video;

pub use audio::AudioEditor;
pub use subtitle::{SubtitleEditor, SubtitleOptions};
pub use video::{video_from_image, VideoEditor, SYNC_TOLERANCE_SEC};

use std::path::Path;

use crate::core::fs::next_available_path;
use crate::core::media::{MediaFile, MediaKind};
use crate::core::{CoreError, CoreResult};

/// Rejects a file whose kind does not match the editor's requirement.
pub(crate) fn require_kind(file: &MediaFile, expected: MediaKind) -> CoreResult<()> {
    if file.kind() != expected {
        return Err(CoreError::TypeMismatch {
            expected,
            actual: file.kind(),
        });
    }
    Ok(())
}

/// Runs `op` against a working copy of `file` and commits on success.
///
/// `op` receives `(original_path, working_path)` and must write its result
/// to the working path. On `Ok` the original is atomically replaced (delete
/// original, move working copy into its place, reload bytes); on `Err` the
/// working copy is deleted and the operation's error is propagated
/// unchanged.
pub(crate) fn apply_edit<F>(file: &mut MediaFile, op: F) -> CoreResult<()>
where
    F: FnOnce(&Path, &Path) -> CoreResult<()>,
{
    let working_path =
        next_available_path(&file.sibling("_work", &file.extension()));
    let working = file.copy_to(&working_path)?;

    match op(file.path(), working.path()) {
        Ok(()) => {
            file.replace_with(working)?;
            tracing::debug!(path = %file.path().display(), "edit committed");
            Ok(())
        }
        Err(error) => {
            if working.exists() {
                let _ = std::fs::remove_file(working.path());
            }
            tracing::error!(
                path = %file.path().display(),
                %error,
                "edit aborted, original left untouched"
            );
            Err(error)
        }
    }
}
