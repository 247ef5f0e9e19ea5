//! Staging Area Lifecycle
//!
//! Pipelines assemble their intermediates inside a private staging
//! directory under the public output directory. `unpack` collapses the
//! staging area: finished artifacts are published next to it under
//! collision-free names and the whole directory is removed, consuming the
//! staging handle so no stage can write into a collapsed area.

use std::path::{Path, PathBuf};

use crate::core::fs::{ensure_dir, next_available_path};
use crate::core::media::MediaFile;
use crate::core::CoreResult;

/// A private working directory for one pipeline run.
#[derive(Debug)]
pub struct StagingArea {
    public_dir: PathBuf,
    dir: PathBuf,
}

impl StagingArea {
    /// Creates a fresh staging directory named `name` under `public_dir`.
    ///
    /// Concurrent runs never share a directory: if `name` is taken the
    /// suffixes `name(1)`, `name(2)`, ... are tried in order.
    pub fn create(public_dir: impl Into<PathBuf>, name: &str) -> CoreResult<Self> {
        let public_dir = public_dir.into();
        ensure_dir(&public_dir)?;
        let dir = next_available_path(&public_dir.join(name));
        ensure_dir(&dir)?;
        tracing::debug!(dir = %dir.display(), "created staging area");
        Ok(Self { public_dir, dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file inside the staging area.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Publishes `result` into the public directory and removes the staging
    /// area, intermediates and all.
    pub fn unpack(self, result: &MediaFile) -> CoreResult<MediaFile> {
        let mut published = self.unpack_all(&[result])?;
        Ok(published.remove(0))
    }

    /// Publishes every `result` into the public directory under a
    /// collision-free name, then removes the staging area. Consumes the
    /// area; every intermediate not in `results` is discarded with it.
    pub fn unpack_all(self, results: &[&MediaFile]) -> CoreResult<Vec<MediaFile>> {
        let mut published = Vec::with_capacity(results.len());
        for result in results {
            let target = next_available_path(&self.public_dir.join(result.file_name()));
            published.push(result.copy_to(&target)?);
        }
        std::fs::remove_dir_all(&self.dir)?;
        tracing::info!(
            dir = %self.dir.display(),
            published = published.len(),
            "collapsed staging area"
        );
        Ok(published)
    }
}
