//! Model Fallback Runner
//!
//! Runs a prompt against an ordered candidate list, retrying on transient
//! service rejections and restoring the client's resting model after every
//! attempt so a fallback run never leaks its model switches.

use std::time::Duration;

use crate::core::{CoreError, CoreResult};

use super::{ModelClient, ModelResponse};

/// Which service rejections are worth trying the next candidate for, and
/// how long to rest between attempts.
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    pub backoff: Duration,
    /// Upstream status codes treated as transient.
    pub retryable_statuses: Vec<u16>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(1),
            retryable_statuses: vec![400, 404, 429],
        }
    }
}

impl FallbackPolicy {
    fn should_retry(&self, error: &CoreError) -> bool {
        match error {
            CoreError::Service { status, .. } => self.retryable_statuses.contains(status),
            _ => false,
        }
    }
}

/// Ordered, deduplicated candidate list: the requested model first, then
/// the fallback pool with repeats removed.
fn candidate_list(requested: &str, fallback_pool: &[String]) -> Vec<String> {
    let mut candidates = vec![requested.to_string()];
    for model in fallback_pool {
        if !candidates.iter().any(|c| c == model) {
            candidates.push(model.clone());
        }
    }
    candidates
}

/// Runs `prompt` against the client's current model, falling back through
/// `fallback_pool` on retryable rejections.
///
/// The client's current model before the call is its resting model; it is
/// restored after every attempt, successful or not. A non-retryable error
/// aborts the run immediately. When every candidate is rejected with a
/// retryable error, the last error is returned wrapped in
/// `CoreError::ModelsExhausted`.
pub async fn run_with_fallback<C: ModelClient + ?Sized>(
    client: &mut C,
    fallback_pool: &[String],
    policy: &FallbackPolicy,
    prompt: &str,
) -> CoreResult<ModelResponse> {
    let resting = client.current_model().to_string();
    let candidates = candidate_list(&resting, fallback_pool);

    let mut last_error: Option<CoreError> = None;
    for candidate in &candidates {
        client.set_current_model(candidate);
        // Session setup is part of the attempt; its failures are classified
        // the same way as run failures.
        let attempt = match client.reconnect().await {
            Ok(()) => client.run(prompt).await,
            Err(error) => Err(error),
        };
        client.set_current_model(&resting);

        match attempt {
            Ok(response) => return Ok(response),
            Err(error) if policy.should_retry(&error) => {
                tracing::warn!(model = %candidate, %error, "model rejected attempt, falling back");
                last_error = Some(error);
                tokio::time::sleep(policy.backoff).await;
            }
            Err(error) => return Err(error),
        }
    }

    match last_error {
        Some(error) => Err(CoreError::ModelsExhausted(Box::new(error))),
        None => Err(CoreError::InvalidArgument(
            "no candidate models to run".to_string(),
        )),
    }
}
