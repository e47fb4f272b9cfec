//! Randomized exponential retry policy and operational hook contracts.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use scommon::Sleeper;

/// Classifies an error as transient (worth another attempt) or terminal.
pub trait RetryClassify: Error {
    fn is_retryable(&self) -> bool;

    fn kind_name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
    pub multiplier: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
            multiplier: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_wait_bounds(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.min_wait = min_wait.min(max_wait);
        self.max_wait = max_wait;
        self
    }

    pub fn with_multiplier(mut self, multiplier: Duration) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn should_retry(&self, attempt: u32, error: &dyn RetryClassify) -> bool {
        error.is_retryable() && attempt < self.max_attempts
    }

    /// Upper bound of the wait after `attempt` (1-based): `multiplier * 2^(attempt - 1)`
    /// clamped to `[min_wait, max_wait]`.
    pub fn envelope_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(62) as i32;
        let unbounded = self.multiplier.as_secs_f64() * 2_f64.powi(exponent);
        let clamped = unbounded
            .min(self.max_wait.as_secs_f64())
            .max(self.min_wait.as_secs_f64());
        Duration::from_secs_f64(clamped)
    }

    /// Uniformly random wait in `[min_wait, envelope_for_attempt(attempt)]`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let upper = self.envelope_for_attempt(attempt).as_secs_f64();
        let lower = self.min_wait.as_secs_f64().min(upper);
        if upper <= lower {
            return Duration::from_secs_f64(upper);
        }

        let seconds = rand::thread_rng().gen_range(lower..=upper);
        Duration::from_secs_f64(seconds)
    }
}

/// Failure of a retried operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// A non-retryable error stopped the loop early.
    Aborted { attempts: u32, error: E },
    /// Every allowed attempt failed; holds the last error.
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Aborted { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    pub fn error(&self) -> &E {
        match self {
            Self::Aborted { error, .. } => error,
            Self::Exhausted { last_error, .. } => last_error,
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            Self::Aborted { error, .. } => error,
            Self::Exhausted { last_error, .. } => last_error,
        }
    }
}

impl<E: Display> Display for RetryError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aborted { attempts, error } => {
                write!(f, "aborted after {attempts} attempt(s): {error}")
            }
            Self::Exhausted {
                attempts,
                last_error,
            } => write!(f, "gave up after {attempts} attempt(s): {last_error}"),
        }
    }
}

impl<E: Error> Error for RetryError<E> {}

pub trait OperationHooks: Send + Sync {
    fn on_attempt_start(&self, _operation: &str, _attempt: u32) {}

    fn on_retry_scheduled(
        &self,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &dyn RetryClassify,
    ) {
    }

    fn on_success(&self, _operation: &str, _attempts: u32) {}

    fn on_failure(&self, _operation: &str, _attempts: u32, _error: &dyn RetryClassify) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl OperationHooks for NoopOperationHooks {}

pub async fn execute_with_retry<T, E, Op, OpFuture>(
    operation: &str,
    policy: &RetryPolicy,
    hooks: &dyn OperationHooks,
    sleeper: &dyn Sleeper,
    mut execute: Op,
) -> Result<T, RetryError<E>>
where
    E: RetryClassify,
    Op: FnMut(u32) -> OpFuture,
    OpFuture: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;

    loop {
        hooks.on_attempt_start(operation, attempt);

        match execute(attempt).await {
            Ok(value) => {
                hooks.on_success(operation, attempt);
                return Ok(value);
            }
            Err(error) => {
                if policy.should_retry(attempt, &error) {
                    let delay = policy.backoff_for_attempt(attempt);
                    hooks.on_retry_scheduled(operation, attempt, delay, &error);
                    sleeper.sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                hooks.on_failure(operation, attempt, &error);
                if error.is_retryable() {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last_error: error,
                    });
                }

                return Err(RetryError::Aborted {
                    attempts: attempt,
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use scommon::RecordingSleeper;

    use super::*;
    use crate::{ProviderError, ProviderErrorKind};

    #[derive(Debug)]
    struct MisconfiguredError;

    impl Display for MisconfiguredError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("misconfigured")
        }
    }

    impl Error for MisconfiguredError {}

    impl RetryClassify for MisconfiguredError {
        fn is_retryable(&self) -> bool {
            false
        }

        fn kind_name(&self) -> &'static str {
            "configuration"
        }
    }

    #[test]
    fn retry_policy_uses_classification_and_attempt_limit() {
        let policy = RetryPolicy::new(3);
        let timeout = ProviderError::timeout("timed out");
        let rejected = ProviderError::invalid_request("bad request");

        assert!(policy.should_retry(1, &timeout));
        assert!(policy.should_retry(2, &timeout));
        assert!(!policy.should_retry(3, &timeout));
        assert!(policy.should_retry(1, &rejected));
        assert!(!policy.should_retry(1, &MisconfiguredError));
    }

    #[test]
    fn envelope_grows_and_caps() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.envelope_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.envelope_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.envelope_for_attempt(3), Duration::from_secs(4));
        assert_eq!(policy.envelope_for_attempt(5), Duration::from_secs(16));
        assert_eq!(policy.envelope_for_attempt(6), Duration::from_secs(30));
        assert_eq!(policy.envelope_for_attempt(40), Duration::from_secs(30));

        let mut previous = Duration::ZERO;
        for attempt in 1..=10 {
            let envelope = policy.envelope_for_attempt(attempt);
            assert!(envelope >= previous);
            previous = envelope;
        }
    }

    #[test]
    fn backoff_draws_stay_within_bounds() {
        let policy = RetryPolicy::default();

        for attempt in 1..=8 {
            for _ in 0..50 {
                let delay = policy.backoff_for_attempt(attempt);
                assert!(delay >= policy.min_wait, "{delay:?} below min");
                assert!(delay <= policy.envelope_for_attempt(attempt), "{delay:?} above envelope");
                assert!(delay <= policy.max_wait);
            }
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl OperationHooks for RecordingHooks {
        fn on_attempt_start(&self, operation: &str, attempt: u32) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{operation}:{attempt}"));
        }

        fn on_retry_scheduled(
            &self,
            operation: &str,
            attempt: u32,
            _delay: Duration,
            _error: &dyn RetryClassify,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("retry:{operation}:{attempt}"));
        }

        fn on_success(&self, operation: &str, attempts: u32) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{operation}:{attempts}"));
        }

        fn on_failure(&self, operation: &str, attempts: u32, error: &dyn RetryClassify) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{operation}:{attempts}:{}", error.kind_name()));
        }
    }

    #[tokio::test]
    async fn four_failures_then_success_takes_five_attempts() {
        let policy = RetryPolicy::default();
        let hooks = RecordingHooks::default();
        let sleeper = RecordingSleeper::new();
        let attempts = Arc::new(Mutex::new(0_u32));

        let result = execute_with_retry(
            "chat",
            &policy,
            &hooks,
            &sleeper,
            {
                let attempts = Arc::clone(&attempts);
                move |attempt| {
                    let attempts = Arc::clone(&attempts);
                    async move {
                        *attempts.lock().expect("attempts lock") += 1;
                        if attempt < 5 {
                            Err(ProviderError::new(ProviderErrorKind::Transport, "flaky", true))
                        } else {
                            Ok("ok")
                        }
                    }
                }
            },
        )
        .await;

        assert_eq!(result.expect("fifth attempt should succeed"), "ok");
        assert_eq!(*attempts.lock().expect("attempts lock"), 5);
        assert_eq!(sleeper.count(), 4);
        for delay in sleeper.recorded() {
            assert!(delay >= policy.min_wait && delay <= policy.max_wait);
        }

        let events = hooks.events.lock().expect("events lock").clone();
        assert!(events.contains(&"success:chat:5".to_string()));
    }

    #[tokio::test]
    async fn always_failing_operation_is_exhausted_after_five_attempts() {
        let policy = RetryPolicy::default();
        let hooks = RecordingHooks::default();
        let sleeper = RecordingSleeper::new();
        let attempts = Arc::new(Mutex::new(0_u32));

        let result = execute_with_retry::<(), _, _, _>("chat", &policy, &hooks, &sleeper, {
            let attempts = Arc::clone(&attempts);
            move |_| {
                let attempts = Arc::clone(&attempts);
                async move {
                    *attempts.lock().expect("attempts lock") += 1;
                    Err(ProviderError::timeout("still down"))
                }
            }
        })
        .await;

        let error = result.expect_err("operation should exhaust retries");
        assert!(error.is_exhausted());
        assert_eq!(error.attempts(), 5);
        assert_eq!(error.error().kind, ProviderErrorKind::Timeout);
        assert_eq!(*attempts.lock().expect("attempts lock"), 5);
        assert_eq!(sleeper.count(), 4);

        let events = hooks.events.lock().expect("events lock").clone();
        assert!(events.contains(&"failure:chat:5:timeout".to_string()));
    }

    #[tokio::test]
    async fn non_retryable_error_aborts_on_first_attempt() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::new();

        let result = execute_with_retry::<(), _, _, _>(
            "chat",
            &policy,
            &NoopOperationHooks,
            &sleeper,
            |_| async move { Err(MisconfiguredError) },
        )
        .await;

        let error = result.expect_err("result should fail");
        assert!(!error.is_exhausted());
        assert_eq!(error.attempts(), 1);
        assert_eq!(error.into_inner().kind_name(), "configuration");
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn rejected_requests_still_use_the_full_budget() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::new();

        let result = execute_with_retry::<(), _, _, _>(
            "chat",
            &policy,
            &NoopOperationHooks,
            &sleeper,
            |_| async move { Err(ProviderError::invalid_request("bad input")) },
        )
        .await;

        let error = result.expect_err("result should fail");
        assert!(error.is_exhausted());
        assert_eq!(error.attempts(), 5);
        assert_eq!(error.into_inner().kind, ProviderErrorKind::InvalidRequest);
        assert_eq!(sleeper.count(), 4);
    }
}
