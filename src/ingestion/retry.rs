//! Fetch Retry
//!
//! Bounded retry loop with exponential backoff. Only errors the caller marks as
//! retryable are repeated; anything else is returned immediately. When the budget
//! is exhausted the last error is returned unchanged so callers keep its kind.

use crate::config::Settings;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
            backoff_multiplier: 2.0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.retry_attempts,
            settings.retry_base_delay,
            settings.retry_max_delay,
        )
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Delay to wait after failed attempt `attempt` (zero-based)
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let delay_ms = (self.initial_delay.as_millis() as f64)
            * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(delay_ms as u64)
    }
}

/// Retry an async operation, sleeping on the tokio timer between attempts
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation: F,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_sleeper(policy, operation, is_retryable, tokio::time::sleep).await
}

/// Same as [`retry_with_backoff`] with an injectable sleep function
pub async fn retry_with_sleeper<F, Fut, T, E, S, SFut>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: impl Fn(&E) -> bool,
    mut sleep: S,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let last_attempt = attempt + 1 >= attempts;
                if last_attempt || !is_retryable(&err) {
                    return Err(err);
                }

                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt + 1,
                    attempts,
                    err,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_sleeper(
        log: Arc<Mutex<Vec<Duration>>>,
    ) -> impl FnMut(Duration) -> std::future::Ready<()> {
        move |d| {
            log.lock().unwrap().push(d);
            std::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(1));
        let attempts = Arc::new(Mutex::new(0));
        let delays = Arc::new(Mutex::new(Vec::new()));

        let counter = attempts.clone();
        let result = retry_with_sleeper(
            &policy,
            move || {
                let counter = counter.clone();
                async move {
                    let mut count = counter.lock().unwrap();
                    *count += 1;
                    if *count < 3 {
                        Err::<u32, _>("temporary".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            |_| true,
            recording_sleeper(delays.clone()),
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(*attempts.lock().unwrap(), 3);
        assert_eq!(
            *delays.lock().unwrap(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[tokio::test]
    async fn test_exhausted_returns_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10), Duration::from_secs(1));
        let attempts = Arc::new(Mutex::new(0));
        let delays = Arc::new(Mutex::new(Vec::new()));

        let counter = attempts.clone();
        let result: Result<(), String> = retry_with_sleeper(
            &policy,
            move || {
                let counter = counter.clone();
                async move {
                    let mut count = counter.lock().unwrap();
                    *count += 1;
                    Err(format!("failure {}", *count))
                }
            },
            |_| true,
            recording_sleeper(delays.clone()),
        )
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(*attempts.lock().unwrap(), 3);
        // No sleep after the final attempt
        assert_eq!(delays.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_stops_immediately() {
        let policy = RetryPolicy::default();
        let attempts = Arc::new(Mutex::new(0));
        let delays = Arc::new(Mutex::new(Vec::new()));

        let counter = attempts.clone();
        let result: Result<(), String> = retry_with_sleeper(
            &policy,
            move || {
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                    Err("404".to_string())
                }
            },
            |e: &String| e != "404",
            recording_sleeper(delays.clone()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(*attempts.lock().unwrap(), 1);
        assert!(delays.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delay_is_exponential_and_capped() {
        let policy = RetryPolicy::new(5, Duration::from_millis(500), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).max_attempts, 1);
    }
}
