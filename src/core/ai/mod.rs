//! AI Model Invocation
//!
//! The `ModelClient` trait is the boundary to a hosted model service. A
//! client carries a mutable current-model setting so the fallback runner
//! can swap candidates in and out around each attempt.

pub mod fallback;

pub use fallback::{run_with_fallback, FallbackPolicy};

use async_trait::async_trait;

use crate::core::CoreResult;

/// A completed model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    /// Model that produced the content.
    pub model: String,
    pub content: String,
}

/// A stateful client for a hosted model service.
#[async_trait]
pub trait ModelClient: Send {
    /// Model the next `run` call will use.
    fn current_model(&self) -> &str;

    fn set_current_model(&mut self, model: &str);

    /// Re-establishes the session after a model switch.
    async fn reconnect(&mut self) -> CoreResult<()>;

    /// Runs `prompt` against the current model.
    ///
    /// Service-side rejections surface as `CoreError::Service` with the
    /// upstream status code.
    async fn run(&mut self, prompt: &str) -> CoreResult<ModelResponse>;
}
