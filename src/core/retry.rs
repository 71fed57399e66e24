//! Retry utility for collaborators talking to flaky remote services
//!
//! The queue core never retries on its own; outbound collaborators (the SMS
//! gateway sender) wrap their requests with these helpers.

use std::time::Duration;
use tokio::time::sleep;

/// Configurable retry policy for async operations
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Execute an async operation, retrying every failure up to the policy limit
///
/// # Examples
/// ```rust
/// use clinic_queue::core::retry::{retry_async, RetryPolicy};
///
/// # async fn example() -> Result<String, String> {
/// let result = retry_async(
///     "gateway_ping",
///     RetryPolicy::default(),
///     || async { Ok::<String, String>("pong".to_string()) }
/// ).await?;
/// # Ok(result)
/// # }
/// ```
pub async fn retry_async<F, T, E, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_async_if(operation_name, policy, operation, |_| true).await
}

/// Execute an async operation, retrying only failures accepted by `is_transient`
///
/// Permanent failures (e.g. a rejected request) are returned immediately.
/// A policy with `max_attempts == 0` still performs one attempt.
pub async fn retry_async_if<F, T, E, Fut, P>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= attempts || !is_transient(&error) {
                    return Err(error);
                }
                log::debug!(
                    "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name,
                    attempt,
                    attempts,
                    policy.delay,
                    error
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
