//! Exponential backoff retry shared by the interactive loop and the
//! conversation driver.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl RetryPolicy {
    /// The first attempt plus one retry after a short pause.
    pub fn single_retry() -> Self {
        Self {
            max_attempts: 2,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
        }
    }

    /// Exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::single_retry()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_retry()
    }
}

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `policy.max_attempts` times. It receives the
/// 1-based attempt number. An error for which `retryable` returns false is
/// returned immediately and unwrapped.
///
/// `wrap_exhausted` converts the last error into the appropriate
/// `RetriesExhausted` variant for the caller's error type. It is only applied
/// when more than one attempt was made.
pub async fn retry_with_backoff<T, E, Fut, F, R, W>(
    policy: RetryPolicy,
    mut attempt: F,
    retryable: R,
    wrap_exhausted: W,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    W: FnOnce(E) -> E,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = ExponentialBackoff {
        initial_interval: policy.initial_interval,
        max_interval: policy.max_interval,
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    loop {
        attempts += 1;

        let error = match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !retryable(&error) {
            return Err(error);
        }

        if attempts >= max_attempts {
            return Err(if attempts > 1 {
                wrap_exhausted(error)
            } else {
                error
            });
        }

        if let Some(wait_duration) = backoff.next_backoff() {
            tokio::time::sleep(wait_duration).await;
        }
    }
}
