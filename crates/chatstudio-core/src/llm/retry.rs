//! Bounded retry for transient inference failures.
//!
//! Only errors for which [`LlmError::is_transient`] holds are retried. The
//! caller persists the reply after this returns, so a retried request can
//! never produce a second assistant message.

use std::future::Future;
use std::time::Duration;

use chatstudio_types::config::StudioConfig;
use chatstudio_types::llm::LlmError;
use tracing::warn;

/// How many extra attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Run `op` until it succeeds, fails permanently, or retries run out.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = match &err {
                    LlmError::RateLimited {
                        retry_after_ms: Some(ms),
                    } => Duration::from_millis(*ms).max(policy.backoff * attempt),
                    _ => policy.backoff * attempt,
                };
                warn!(attempt, max = policy.max_retries, error = %err, "Transient inference failure, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
