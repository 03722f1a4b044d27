//! Bounded retry for unreliable network calls
//!
//! Every network-facing call in the agent goes through one of these
//! combinators: a fixed attempt budget, a fixed inter-attempt delay, a log
//! line per failure, and the last error surfaced once the budget is spent.
//! The classified variant lets callers mark errors that retrying cannot fix;
//! those stop the loop on the spot.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Attempt budget and inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(1200))
    }
}

/// How a failed attempt should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transient,
    Terminal,
}

/// Why a retried operation gave up.
#[derive(Debug, Error)]
pub enum RetryError<E: Display + Debug> {
    #[error("{label} failed after {attempts} attempts: {source}")]
    Exhausted {
        label: String,
        attempts: u32,
        source: E,
    },
    #[error("{0}")]
    Terminal(E),
}

impl<E: Display + Debug> RetryError<E> {
    /// The underlying error, whichever way the budget ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { source, .. } => source,
            RetryError::Terminal(e) => e,
        }
    }
}

/// Retry with every error treated as transient.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    op: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display + Debug,
{
    retry_classified(policy, label, |_| ErrorClass::Transient, op).await
}

/// Retry until success, a terminal error, or the attempt budget is spent.
pub async fn retry_classified<T, E, F, Fut, C>(
    policy: RetryPolicy,
    label: &str,
    classify: C,
    mut op: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    C: Fn(&E) -> ErrorClass,
    E: Display + Debug,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if classify(&err) == ErrorClass::Terminal {
                    return Err(RetryError::Terminal(err));
                }
                warn!(label, attempt, error = %err, "attempt failed");
                if attempt >= attempts {
                    return Err(RetryError::Exhausted {
                        label: label.to_string(),
                        attempts,
                        source: err,
                    });
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(0))
    }

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let calls = AtomicU32::new(0);
        let result = retry(fast(10), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stops_retrying_on_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry(fast(10), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("boom".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_exactly_the_budget_and_keeps_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry(fast(4), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("failure {n}")) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result.unwrap_err() {
            RetryError::Exhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(source, "failure 3");
            }
            RetryError::Terminal(_) => panic!("expected exhaustion"),
        }
    }

    #[tokio::test]
    async fn terminal_errors_stop_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_classified(
            fast(10),
            "op",
            |err: &String| {
                if err.contains("revert") {
                    ErrorClass::Terminal
                } else {
                    ErrorClass::Transient
                }
            },
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("execution revert".to_string()) }
            },
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result.unwrap_err(), RetryError::Terminal(_)));
    }

    #[tokio::test]
    async fn zero_attempt_budget_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry(fast(0), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom".to_string()) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[test]
    fn into_inner_unwraps_both_shapes() {
        let exhausted: RetryError<String> = RetryError::Exhausted {
            label: "op".to_string(),
            attempts: 3,
            source: "last".to_string(),
        };
        assert_eq!(exhausted.into_inner(), "last");
        let terminal: RetryError<String> = RetryError::Terminal("stop".to_string());
        assert_eq!(terminal.into_inner(), "stop");
    }
}
