//! Bounded retry for endpoints backed by asynchronous server work.
//!
//! The server answers 202 while a diagram or a parse is still running. Every
//! polling endpoint funnels through [`retry_if`], which re-issues the same
//! request a fixed number of times with a fixed delay in between.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero behaves like one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Attempts actually performed: at least one request is always sent.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_RETRY_LIMIT,
            Duration::from_millis(crate::config::DEFAULT_POLL_DELAY_MS),
        )
    }
}

/// Run `op` until it succeeds, fails with an error `should_retry` rejects,
/// or the policy runs out of attempts.
///
/// The first success is returned as is. An error that `should_retry` does
/// not accept is returned immediately without another attempt. When every
/// attempt failed with a retryable error, the error of the *first* attempt
/// is returned, since that is the one that triggered the polling.
///
/// Worst case this takes `attempts × (time per attempt) + (attempts − 1) ×
/// delay`. Drop the future to give up early.
pub async fn retry_if<T, E, F, Fut, P>(
    policy: RetryPolicy,
    mut op: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let attempts = policy.attempts();

    let first_error = match op().await {
        Ok(value) => return Ok(value),
        Err(e) if !should_retry(&e) => return Err(e),
        Err(e) => e,
    };

    for attempt in 2..=attempts {
        tracing::info!(
            attempt = attempt - 1,
            max_attempts = attempts,
            delay_ms = policy.delay.as_millis() as u64,
            "resource not ready, retrying"
        );
        sleep(policy.delay).await;

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !should_retry(&e) => return Err(e),
            Err(_) => continue,
        }
    }

    tracing::warn!(attempts, "resource still not ready, giving up");
    Err(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Debug, PartialEq)]
    enum Outcome {
        NotReady(u32),
        Fatal(u32),
    }

    fn is_not_ready(e: &Outcome) -> bool {
        matches!(e, Outcome::NotReady(_))
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(500))
    }

    fn assert_spent_two_delays(start: Instant) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(1000) && elapsed < Duration::from_millis(1100),
            "elapsed {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt() {
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let result = retry_if(
            policy(5),
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(Outcome::NotReady(n))
                } else {
                    Ok(format!("payload from attempt {n}"))
                }
            },
            is_not_ready,
        )
        .await;

        assert_eq!(result, Ok("payload from attempt 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_spent_two_delays(start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_first_error() {
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), Outcome> = retry_if(
            policy(3),
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(Outcome::NotReady(n))
            },
            is_not_ready,
        )
        .await;

        assert_eq!(result, Err(Outcome::NotReady(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // no sleep after the last attempt
        assert_spent_two_delays(start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_is_not_retried() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), Outcome> = retry_if(
            policy(10),
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 1 {
                    Err(Outcome::NotReady(n))
                } else {
                    Err(Outcome::Fatal(n))
                }
            },
            is_not_ready,
        )
        .await;

        assert_eq!(result, Err(Outcome::Fatal(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_does_not_sleep() {
        let start = Instant::now();
        let result: Result<u8, Outcome> =
            retry_if(policy(3), || async { Ok(1) }, is_not_ready).await;
        assert_eq!(result, Ok(1));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_still_sends_one_request() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), Outcome> = retry_if(
            policy(0),
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Outcome::NotReady(1))
            },
            is_not_ready,
        )
        .await;

        assert_eq!(result, Err(Outcome::NotReady(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
