//! Filesystem utilities.
//!
//! Collision-avoiding path selection shared by the staging lifecycle, the
//! editors' working copies, and the pipelines' intermediate files.

use std::path::{Path, PathBuf};

use crate::core::CoreResult;

/// Creates a directory (and parents) if it does not already exist.
pub fn ensure_dir(path: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Returns the first unused path derived from `base`.
///
/// If `base` is free it is returned unchanged; otherwise a counter is
/// inserted before the extension: `name`, `name(1)`, `name(2)`, …
/// Works for directories as well as files (a directory name has no
/// extension, so the counter is simply appended).
pub fn next_available_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }

    let directory = base.parent().map(Path::to_path_buf).unwrap_or_default();
    let (name, extension) = split_name_extension(base);

    let mut counter = 1usize;
    loop {
        let candidate = directory.join(format!("{}({}){}", name, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a path's file name into (stem, extension-with-dot).
///
/// Dotfiles such as `.gitignore` are treated as extensionless names.
fn split_name_extension(path: &Path) -> (String, String) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if file_name.starts_with('.') || !file_name.contains('.') {
        return (file_name, String::new());
    }

    match file_name.rsplit_once('.') {
        Some((name, ext)) => (name.to_string(), format!(".{}", ext)),
        None => (file_name, String::new()),
    }
}
