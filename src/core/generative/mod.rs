//! Generative Provider Boundary
//!
//! Async traits for the hosted generators the pipelines depend on: image
//! generation, speech synthesis, and background-audio sourcing. Production
//! implementations wrap provider SDKs; the mocks here write fake media so
//! pipelines are testable end to end without network access.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::media::MediaFile;
use crate::core::CoreResult;

/// Provider-facing generation parameters.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Provider model identifier, if the caller wants to pin one.
    pub model: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_sec: Option<f64>,
    /// Free-form provider parameters; each provider filters these through
    /// its own allow-list before building a request.
    pub extra: HashMap<String, Value>,
}

impl GenerationOptions {
    /// The subset of `extra` whose keys appear in `keys`. Unknown
    /// parameters are dropped rather than forwarded.
    pub fn allowed(&self, keys: &[&str]) -> HashMap<String, Value> {
        self.extra
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Generates a still image (or short clip seed) from a text prompt.
///
/// Returns the artifact and, when the provider reports one, the cost of
/// the generation call.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn create(
        &self,
        prompt: &str,
        output_path: &Path,
        options: &GenerationOptions,
    ) -> CoreResult<(MediaFile, Option<f64>)>;
}

/// Synthesizes narration speech from text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, output_path: &Path, voice: &str)
        -> CoreResult<MediaFile>;
}

/// Sources background audio from a pool of candidate locations.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Downloads one randomly-chosen track from `urls` to `output_path`.
    ///
    /// Fails with `InvalidArgument` when `urls` is empty.
    async fn download_random(&self, urls: &[String], output_path: &Path) -> CoreResult<MediaFile>;
}

#[cfg(test)]
pub(crate) mod mocks {
    //! Fake providers that write fake media files (first token = duration).

    use super::*;
    use crate::core::media::MediaKind;
    use crate::core::CoreError;
    use rand::Rng;

    pub struct MockImageGenerator;

    #[async_trait]
    impl ImageGenerator for MockImageGenerator {
        async fn create(
            &self,
            _prompt: &str,
            output_path: &Path,
            _options: &GenerationOptions,
        ) -> CoreResult<(MediaFile, Option<f64>)> {
            std::fs::write(output_path, "0 generated image")?;
            Ok((MediaFile::open(output_path, MediaKind::Image)?, None))
        }
    }

    pub struct MockSpeechSynthesizer {
        /// Duration of the synthesized speech, in seconds.
        pub speech_sec: f64,
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSpeechSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            output_path: &Path,
            _voice: &str,
        ) -> CoreResult<MediaFile> {
            std::fs::write(output_path, format!("{} speech", self.speech_sec))?;
            MediaFile::open(output_path, MediaKind::Audio)
        }
    }

    pub struct MockAudioSource {
        /// Duration of the downloaded track, in seconds.
        pub track_sec: f64,
    }

    #[async_trait]
    impl AudioSource for MockAudioSource {
        async fn download_random(
            &self,
            urls: &[String],
            output_path: &Path,
        ) -> CoreResult<MediaFile> {
            if urls.is_empty() {
                return Err(CoreError::InvalidArgument(
                    "background audio url pool must not be empty".to_string(),
                ));
            }
            let picked = &urls[rand::thread_rng().gen_range(0..urls.len())];
            std::fs::write(output_path, format!("{} track from {picked}", self.track_sec))?;
            MediaFile::open(output_path, MediaKind::Audio)
        }
    }
}
