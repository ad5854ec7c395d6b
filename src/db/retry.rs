//! Bounded, fixed-delay retry used while waiting for the database to come up.

use std::future::Future;
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    /// `attempts` counts the first try; it is clamped to at least one.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times((self.attempts - 1) as usize)
    }
}

/// Run `op` until it succeeds or the policy's attempts are used up.
/// The last error is returned on exhaustion.
pub async fn retry_bounded<T, E, F, Fut>(policy: RetryPolicy, what: &str, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    op.retry(policy.backoff())
        .notify(|err: &E, dur: Duration| {
            attempt += 1;
            warn!(
                attempt,
                max_attempts = policy.attempts,
                error = %err,
                "{what} failed, retrying in {:?}",
                dur
            );
        })
        .await
}
