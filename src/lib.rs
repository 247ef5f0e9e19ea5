//! Mediaforge, a media assembly engine.
//!
//! Assembles composite media artifacts (narrated videos, subtitled clips,
//! audio-with-background tracks) by chaining calls to external generation
//! services and local FFmpeg invocations. The engine guarantees
//! transactional, rollback-safe mutation of on-disk media files and manages
//! the staging-directory lifecycle for multi-step pipelines.

pub mod core;

pub use crate::core::{CoreError, CoreResult};

use tracing_subscriber::EnvFilter;

/// Initializes process-wide logging.
///
/// Logging is explicit, not ambient: library functions never install a
/// subscriber themselves. Returns `true` if this call installed the global
/// subscriber, `false` if one was already set (e.g. by the embedding
/// application or a previous call).
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
