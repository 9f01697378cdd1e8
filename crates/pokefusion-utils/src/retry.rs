//! Generic retry executor for fallible async operations
//!
//! Re-invokes an operation up to `max_retries` times with a fixed delay
//! between attempts (no delay after the final failure), surfacing the last
//! observed error on exhaustion. The executor is generic over what the
//! operation does and never inspects the result shape; callers distinguish
//! "retry this" from "fail now" with [`AttemptError`].

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry budget and pacing.
#[derive(Debug, Clone, Copy)]
pub struct RetryOptions {
    /// Total number of attempts (not additional retries).
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryOptions {
    #[must_use]
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

/// Outcome of one failed attempt: try again or abort immediately.
///
/// Modeling the split as a tagged error keeps the executor free of any
/// knowledge about which error kinds are transient.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// Transient failure; re-run if the budget allows.
    Retryable(E),
    /// Terminal failure; surface without consuming the budget.
    Fatal(E),
}

impl<E> AttemptError<E> {
    /// Unwrap to the underlying error either way.
    pub fn into_inner(self) -> E {
        match self {
            AttemptError::Retryable(e) | AttemptError::Fatal(e) => e,
        }
    }
}

/// Run `operation` up to `options.max_retries` times.
///
/// Returns the first success immediately. Retryable failures sleep
/// `options.delay` before the next attempt, except after the final one.
/// Fatal failures and exhausted budgets surface the underlying error.
/// Each failed attempt is logged at warn level; that logging is
/// observability, not part of the contract.
pub async fn with_retry<T, E, F, Fut>(mut operation: F, options: RetryOptions) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError<E>>>,
    E: Display,
{
    let max_attempts = options.max_retries.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(AttemptError::Fatal(err)) => {
                warn!(attempt, error = %err, "operation failed fatally");
                return Err(err);
            }
            Err(AttemptError::Retryable(err)) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "attempt failed"
                );
                if attempt >= max_attempts {
                    return Err(err);
                }
                tokio::time::sleep(options.delay).await;
            }
        }
    }
}
