use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::retryable_strategy::RetryableStrategy;

/// Per-retry delay hook. Receives the 1-based index of the upcoming retry.
pub type DelayFn = dyn Fn(u32) -> Duration + Send + Sync;

/// `RetryPolicy` configures how [`retry`](crate::retry) and
/// [`retry_with_value`](crate::retry_with_value) drive an operation.
///
/// A policy is a value: once built it is only ever read, so a single instance can be shared by
/// any number of concurrent runs. Adjusting an existing policy goes through
/// [`with_delay_fn`](Self::with_delay_fn), which returns an independent copy.
///
/// Retries are only enabled when the policy has a [strategy](Self::retry_on) *and* allows at
/// least one attempt. Otherwise the executor simply calls the operation once.
///
/// ```
/// use cancellable_retry::{DefaultRetryableStrategy, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::<std::io::Error>::new(4)
///     .retry_on(DefaultRetryableStrategy)
///     .with_delay(Duration::from_millis(250));
///
/// assert_eq!(policy.delay_for(1), Some(Duration::from_millis(250)));
///
/// // Deriving a variant leaves the original alone.
/// let linear = policy.with_delay_fn(|retry| Duration::from_millis(100) * retry);
/// assert_eq!(linear.delay_for(3), Some(Duration::from_millis(300)));
/// assert_eq!(policy.delay_for(3), Some(Duration::from_millis(250)));
/// ```
pub struct RetryPolicy<E> {
    max_attempts: u32,
    strategy: Option<Arc<dyn RetryableStrategy<E>>>,
    delay: Duration,
    delay_fn: Option<Arc<DelayFn>>,
}

impl<E> RetryPolicy<E> {
    /// Construct a policy allowing at most `max_attempts` calls, the first one included.
    ///
    /// The policy has no strategy and no delay yet: until [`retry_on`](Self::retry_on) is set
    /// the operation runs exactly once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            strategy: None,
            delay: Duration::ZERO,
            delay_fn: None,
        }
    }

    /// Set the strategy classifying each attempt's outcome.
    pub fn retry_on<S>(mut self, strategy: S) -> Self
    where
        S: RetryableStrategy<E> + 'static,
    {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Set a fixed delay applied before every attempt after the first.
    ///
    /// A zero delay means the executor only checks the cancellation signal between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a copy of this policy whose delays are computed by `delay_fn`.
    ///
    /// `delay_fn` is called once per retry with the 1-based index of the upcoming retry: for a
    /// policy of three attempts it is called with `1` and then `2`. It takes precedence over
    /// any fixed delay. `self` is left untouched.
    pub fn with_delay_fn<F>(&self, delay_fn: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self {
            delay_fn: Some(Arc::new(delay_fn)),
            ..self.clone()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn strategy(&self) -> Option<&dyn RetryableStrategy<E>> {
        self.strategy.as_deref()
    }

    /// The fixed delay. Ignored when a delay function is set.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn has_delay_fn(&self) -> bool {
        self.delay_fn.is_some()
    }

    /// Returns true if the executor will run its retry loop for this policy.
    pub fn is_enabled(&self) -> bool {
        self.strategy.is_some() && self.max_attempts >= 1
    }

    /// The wait before retry number `retry` (1-based).
    ///
    /// Returns `None` when no delay is configured at all, in which case the executor does not
    /// pause between attempts. A delay function always yields `Some`, even for a zero
    /// duration, so its waits still race the cancellation signal.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        match &self.delay_fn {
            Some(delay_fn) => Some(delay_fn(retry)),
            None if self.delay > Duration::ZERO => Some(self.delay),
            None => None,
        }
    }
}

/// The zero policy: no strategy, no attempts, so the operation runs exactly once.
impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            strategy: self.strategy.clone(),
            delay: self.delay,
            delay_fn: self.delay_fn.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("has_strategy", &self.strategy.is_some())
            .field("delay", &self.delay)
            .field("has_delay_fn", &self.delay_fn.is_some())
            .finish()
    }
}
