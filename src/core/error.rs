//! Mediaforge Error Definitions
//!
//! Defines error types used throughout the engine.

use thiserror::Error;

use super::ffmpeg::FfmpegError;
use super::media::MediaKind;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Argument & Construction Errors (rejected before any I/O)
    // =========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Type mismatch: editor requires a {expected} file, got {actual}")]
    TypeMismatch {
        expected: MediaKind,
        actual: MediaKind,
    },

    // =========================================================================
    // File Errors
    // =========================================================================
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // External Tool & Service Errors
    // =========================================================================
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] FfmpegError),

    #[error("Service request failed with status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("All candidate models failed: {0}")]
    ModelsExhausted(#[source] Box<CoreError>),

    #[error("Timeout: {0}")]
    Timeout(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
