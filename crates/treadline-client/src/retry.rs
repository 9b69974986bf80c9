//! Retry with exponential back-off and jitter for read requests.
//!
//! Only idempotent GETs go through [`RetryPolicy::run`]. Cart mutations are
//! sent once and their failures surfaced to the caller.

use std::future::Future;
use std::time::Duration;

use treadline_core::AppConfig;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures and 5xx responses.
///
/// **Not retriable:** 404 and other 4xx statuses, malformed bodies and
/// configuration errors. Retrying would return the same result.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// How read requests are retried: how many extra attempts, and the
/// exponential back-off between them.
///
/// The delay before retry `n` (1-based) is `base × 2ⁿ⁻¹`, clamped to `max_delay`,
/// then scaled by a jitter factor in `[0.75, 1.25)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// No retries.
    fn default() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl RetryPolicy {
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new(max_retries: u32, base: Duration) -> Self {
        Self {
            max_retries,
            base,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_backoff_base_ms),
        )
        .with_max_delay(Duration::from_millis(config.retry_max_delay_ms))
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Back-off before retry number `retry` (1-based), before jitter.
    #[must_use]
    pub fn delay_before(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(16);
        self.base
            .checked_mul(1u32 << doublings)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Runs `operation`, retrying transient failures until it succeeds, fails
    /// permanently, or the retry budget is spent.
    pub(crate) async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut retries = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retries == self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retries += 1;

            let delay = self
                .delay_before(retries)
                .mul_f64(rand::random_range(0.75..1.25));
            tracing::warn!(
                retry = retries,
                of = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient storefront API failure; backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
