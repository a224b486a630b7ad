//! Bounded retry of operations that fail with transient (transport-level) errors.

use anyhow::{Result, anyhow};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts for a retried operation.
pub const MAX_RETRIES: usize = 3;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// How many times an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `attempts` is clamped to at least one.
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, Duration::from_millis(RETRY_DELAY_MS))
    }
}

/// A request that never produced a response: connection refused, timeout,
/// DNS failure and the like. Always considered transient.
#[derive(Debug)]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Returns true if the error is a transport-level failure worth retrying.
///
/// HTTP status errors are application-level and are not retried.
pub fn is_transient(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        if cause.downcast_ref::<TransportError>().is_some() {
            return true;
        }
        match cause.downcast_ref::<reqwest::Error>() {
            Some(re) => re.status().is_none() && !re.is_builder() && !re.is_decode(),
            None => false,
        }
    })
}

/// Executes an async operation, retrying transient failures.
///
/// The operation runs at most `policy.attempts` times. A success is returned
/// immediately; a non-transient error is returned without retrying. When every
/// attempt fails the last error is returned unchanged.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_transient(&e) {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if attempt < attempts {
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                        operation_name,
                        attempt,
                        attempts,
                        e,
                        policy.delay.as_millis()
                    );
                    tokio::time::sleep(policy.delay).await;
                } else {
                    warn!(
                        "{}: attempt {}/{} failed ({}), giving up",
                        operation_name, attempt, attempts, e
                    );
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow!("{}: failed after {} attempts", operation_name, attempts)))
}
