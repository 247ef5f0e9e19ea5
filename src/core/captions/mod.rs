//! Subtitle Timing Engine
//!
//! Converts free narration text into a contiguous, monotonic sequence of
//! timed subtitle entries. Timing is proportional: each sentence-like chunk
//! gets a share of the subtitle window proportional to its character count.

pub mod style;

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{CoreError, CoreResult};

/// A single timed subtitle.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    /// Start time in seconds, >= 0.
    pub start_sec: f64,
    /// End time in seconds, > start.
    pub end_sec: f64,
    /// Non-empty text.
    pub text: String,
}

/// Terminal punctuation followed by whitespace (optionally through a closing
/// quote) or the end of the text marks a chunk boundary.
static CHUNK_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,!?:]["'”’]?(\s+|$)"#).expect("valid chunk regex"));

/// Segments text into sentence-like chunks.
///
/// Splits after terminal punctuation (`. , ! ? :`) followed by whitespace,
/// a closing quote, or end-of-string; surrounding whitespace is trimmed and
/// empty chunks are dropped.
pub fn split_into_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut previous = 0;

    for boundary in CHUNK_BOUNDARY.find_iter(text) {
        let chunk = text[previous..boundary.end()].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        previous = boundary.end();
    }

    let tail = text[previous..].trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }
    chunks
}

/// Produces timed entries spanning `window_sec` seconds.
///
/// `seconds_per_char = window / char_count(text)`; entries are contiguous
/// (each entry starts where the previous one ended) and the final entry
/// ends at or before the window.
pub fn timed_entries(text: &str, window_sec: f64) -> CoreResult<Vec<SubtitleEntry>> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "subtitle text must not be empty".to_string(),
        ));
    }
    if window_sec <= 0.0 {
        return Err(CoreError::InvalidArgument(
            "subtitle window must be greater than 0".to_string(),
        ));
    }

    let seconds_per_char = window_sec / text.chars().count() as f64;
    let mut entries = Vec::new();
    let mut current = 0.0f64;

    for chunk in split_into_chunks(text) {
        let end = current + seconds_per_char * chunk.chars().count() as f64;
        entries.push(SubtitleEntry {
            start_sec: current,
            end_sec: end,
            text: chunk,
        });
        current = end;
    }

    tracing::debug!(count = entries.len(), window_sec, "generated subtitle entries");
    Ok(entries)
}
