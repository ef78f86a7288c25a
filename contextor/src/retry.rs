//! Bounded exponential backoff around provider calls.

use std::future::Future;
use std::time::Duration;

use ai_llm_service::ProviderError;
use tracing::warn;

/// Retry knobs for embedding and chat calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_ms: 4000,
        }
    }
}

/// Delay before retry number `attempt + 1` (zero-based), capped at `max_backoff_ms`.
pub fn backoff_ms(cfg: &RetryConfig, attempt: u32) -> u64 {
    let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
    let base = cfg.initial_backoff_ms as f64 * cfg.backoff_multiplier.powi(exp);
    base.min(cfg.max_backoff_ms as f64) as u64
}

/// Runs `operation` until it succeeds, fails permanently, or retries run out.
///
/// Only errors for which [`ProviderError::is_transient`] holds are retried;
/// the last error is returned unchanged.
pub async fn with_retry<F, Fut, T>(
    cfg: &RetryConfig,
    what: &str,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(v) => return Ok(v),
            Err(e) if !e.is_transient() || attempt >= cfg.max_retries => return Err(e),
            Err(e) => {
                let delay = backoff_ms(cfg, attempt);
                warn!(
                    call = what,
                    attempt = attempt + 1,
                    max = cfg.max_retries,
                    backoff_ms = delay,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
        }
    }
}
