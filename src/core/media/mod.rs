//! Media Artifact Module
//!
//! A `MediaFile` is a filesystem-backed artifact with identity (its path),
//! extension validation against its declared kind, in-memory bytes loaded
//! at construction, and a derived content hash. It supports the atomic
//! `replace_with` operation that backs the transactional editor protocol.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::fs::ensure_dir;
use crate::core::{CoreError, CoreResult};

/// The kinds of media artifact the engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Subtitle,
}

impl MediaKind {
    /// File extensions (without the dot) accepted for this kind.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["jpg", "jpeg", "png", "gif", "bmp"],
            MediaKind::Audio => &["mp3", "wav", "m4a", "flac", "ogg"],
            MediaKind::Video => &["mp4", "avi", "mov", "mkv", "webm"],
            MediaKind::Subtitle => &["ass", "srt", "vtt"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filesystem-backed media artifact.
#[derive(Debug, Clone)]
pub struct MediaFile {
    path: PathBuf,
    kind: MediaKind,
    data: Vec<u8>,
}

impl MediaFile {
    /// Opens an existing artifact, validating its extension against `kind`
    /// and loading its bytes into memory.
    ///
    /// Fails with `ValidationError` if the extension is not in the kind's
    /// allowed set, `FileNotFound` if the path is missing, and
    /// `ValidationError` if the path is not a regular file.
    pub fn open(path: impl Into<PathBuf>, kind: MediaKind) -> CoreResult<Self> {
        let path = path.into();
        validate_extension(&path, kind)?;
        let data = read_regular_file(&path)?;
        tracing::debug!(path = %path.display(), kind = %kind, "loaded media file");
        Ok(Self { path, kind, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// In-memory bytes as loaded at construction or last reload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// SHA-256 hex digest of the bytes currently on disk.
    pub fn content_hash(&self) -> CoreResult<String> {
        let bytes = read_regular_file(&self.path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Re-reads the on-disk bytes into memory.
    pub fn reload(&mut self) -> CoreResult<()> {
        self.data = read_regular_file(&self.path)?;
        Ok(())
    }

    /// Duplicates the artifact at `destination` and returns the copy.
    pub fn copy_to(&self, destination: &Path) -> CoreResult<MediaFile> {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }
        std::fs::copy(&self.path, destination)?;
        tracing::debug!(
            from = %self.path.display(),
            to = %destination.display(),
            "copied media file"
        );
        MediaFile::open(destination, self.kind)
    }

    /// Atomically supersedes this artifact with `source`: the original file
    /// is deleted, `source` is moved into its place, and the in-memory
    /// bytes are reloaded. `source` ceases to exist at its old path.
    pub fn replace_with(&mut self, source: MediaFile) -> CoreResult<()> {
        if self.exists() {
            std::fs::remove_file(&self.path)?;
        }
        std::fs::rename(&source.path, &self.path)?;
        self.reload()?;
        tracing::debug!(
            path = %self.path.display(),
            from = %source.path.display(),
            "replaced media file with working copy"
        );
        Ok(())
    }

    /// Removes the artifact from disk.
    pub fn delete(&self) -> CoreResult<()> {
        std::fs::remove_file(&self.path)?;
        tracing::debug!(path = %self.path.display(), "deleted media file");
        Ok(())
    }

    /// Parent directory of the artifact.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name without the extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension without the dot.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Full file name, e.g. `speech.wav`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of a sibling file sharing this artifact's stem, with `suffix`
    /// appended and the given extension.
    pub fn sibling(&self, suffix: &str, extension: &str) -> PathBuf {
        self.dir()
            .join(format!("{}{}.{}", self.stem(), suffix, extension))
    }
}

fn validate_extension(path: &Path, kind: MediaKind) -> CoreResult<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !kind.allowed_extensions().contains(&ext.as_str()) {
        return Err(CoreError::ValidationError(format!(
            "{} does not have any of the extensions allowed for {} files: {:?}",
            path.display(),
            kind,
            kind.allowed_extensions()
        )));
    }
    Ok(())
}

fn read_regular_file(path: &Path) -> CoreResult<Vec<u8>> {
    if !path.exists() {
        return Err(CoreError::FileNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(CoreError::ValidationError(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    Ok(std::fs::read(path)?)
}
