//! Mediaforge Core Engine
//!
//! Core assembly machinery: transactional media files and editors, the
//! duration synchronizer, subtitle timing and styling, the staging
//! lifecycle, and the resilient model-fallback wrapper.

pub mod ai;
pub mod captions;
pub mod editors;
pub mod ffmpeg;
pub mod fs;
pub mod generative;
pub mod media;
pub mod pipelines;
pub mod process;
pub mod staging;

mod error;
pub use error::*;
