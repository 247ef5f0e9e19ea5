//! Pipeline Compositions
//!
//! The concrete multi-step recipes: mixed narration audio, a narrated
//! video clip, and subtitled variants of that clip. Each recipe assembles
//! its intermediates inside a staging area and publishes only the final
//! artifacts. Configuration is composed from small, independently
//! validated option structs.

mod narrated_video;
mod narration;
mod subtitled_video;

pub use narrated_video::NarratedVideo;
pub use narration::NarrationWithBackground;
pub use subtitled_video::SubtitledNarratedVideo;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::generative::GenerationOptions;
use crate::core::{CoreError, CoreResult};

/// Narration synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationOptions {
    pub text: String,
    pub voice: String,
    /// Silence appended after the speech, in seconds.
    pub silence_tail_sec: f64,
}

impl NarrationOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: "en_US-amy-medium".to_string(),
            silence_tail_sec: 5.0,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.text.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "narration text must not be empty".to_string(),
            ));
        }
        if self.silence_tail_sec < 0.0 {
            return Err(CoreError::InvalidArgument(
                "silence tail must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Background audio parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundOptions {
    /// Candidate track locations; one is picked at random.
    pub urls: Vec<String>,
    /// Background weight in the mix, `0.0..=2.0`; the narration gets the
    /// complement.
    pub relative_volume: f64,
}

impl BackgroundOptions {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            relative_volume: 0.5,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.urls.is_empty() {
            return Err(CoreError::InvalidArgument(
                "background audio url pool must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.relative_volume) {
            return Err(CoreError::InvalidArgument(
                "relative_volume must be between 0 and 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Image-to-video parameters.
#[derive(Debug, Clone)]
pub struct ImageVideoOptions {
    pub prompt: String,
    /// Length of the clip rendered from the generated image, before
    /// duration synchronization.
    pub base_clip_sec: f64,
    pub generation: GenerationOptions,
    /// Bounded wait on the image-generation service.
    pub timeout: Duration,
}

impl ImageVideoOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            base_clip_sec: 6.0,
            generation: GenerationOptions::default(),
            timeout: Duration::from_secs(600),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "image prompt must not be empty".to_string(),
            ));
        }
        if self.base_clip_sec <= 0.0 {
            return Err(CoreError::InvalidArgument(
                "base clip duration must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
