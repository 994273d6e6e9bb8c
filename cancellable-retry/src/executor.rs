//! `retry` and `retry_with_value` run an operation under a [`RetryPolicy`].

use std::future::Future;
use std::pin::pin;

use futures::future::{self, Either};

use crate::error::Interrupted;
use crate::policy::RetryPolicy;
use crate::signal::CancelSignal;

/// Run `operation` under `policy`, returning the error of the last attempt or `Ok(())`.
///
/// This is [`retry_with_value`] for operations that only report success or failure.
///
/// ```
/// use cancellable_retry::{retry, CancelSignal, DefaultRetryableStrategy, RetryPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = RetryPolicy::new(3).retry_on(DefaultRetryableStrategy);
/// let mut calls = 0;
/// let res: anyhow::Result<()> = retry(&CancelSignal::new(), &policy, || {
///     calls += 1;
///     let failed = calls < 2;
///     async move {
///         if failed {
///             anyhow::bail!("flaky");
///         }
///         Ok(())
///     }
/// })
/// .await;
/// assert!(res.is_ok());
/// assert_eq!(calls, 2);
/// # }
/// ```
pub async fn retry<E, F, Fut>(
    signal: &CancelSignal,
    policy: &RetryPolicy<E>,
    operation: F,
) -> Result<(), E>
where
    E: From<Interrupted>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    retry_with_value(signal, policy, operation).await
}

/// Run `operation` under `policy`, returning the outcome of the last attempt.
///
/// The first attempt always runs, whatever the state of `signal`. After every attempt the
/// policy's strategy classifies the outcome; when it asks for a retry and attempts are left,
/// the executor waits for the policy's delay and tries again. The loop stops when:
///
/// - the strategy declines to retry: that outcome is returned as is, even if `signal` is
///   already done;
/// - the attempts are exhausted: the last outcome is returned as is;
/// - `signal` is done before or during a wait: the [`Interrupted`] reason is returned,
///   converted into `E`, and the operation is not called again. The outcome of the attempt
///   before the wait is dropped, so a value it produced is not handed back.
///
/// A policy without a strategy, or allowing fewer than one attempt, calls the operation once
/// and returns its outcome without looking at `signal` at all.
///
/// The operation is only ever called from the caller's task, one attempt at a time, so it may
/// freely carry mutable state across attempts.
pub async fn retry_with_value<T, E, F, Fut>(
    signal: &CancelSignal,
    policy: &RetryPolicy<E>,
    mut operation: F,
) -> Result<T, E>
where
    E: From<Interrupted>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let strategy = match policy.strategy() {
        Some(strategy) if policy.max_attempts() >= 1 => strategy,
        _ => return operation().await,
    };

    let mut n_past_attempts: u32 = 0;
    loop {
        let outcome = operation().await;
        n_past_attempts += 1;

        let retryable = strategy.handle(outcome.as_ref().err());
        #[cfg(feature = "tracing")]
        tracing::trace!(
            attempt = n_past_attempts,
            max_attempts = policy.max_attempts(),
            failed = outcome.is_err(),
            retryable,
            "Retry attempt finished"
        );
        if !retryable || n_past_attempts >= policy.max_attempts() {
            return outcome;
        }

        // Only the latest outcome is kept; the next attempt replaces it.
        drop(outcome);
        if let Err(interrupted) = wait_before_retry(signal, policy, n_past_attempts).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt = n_past_attempts,
                reason = %interrupted,
                "Retry loop interrupted before the next attempt"
            );
            return Err(interrupted.into());
        }
    }
}

/// Waits out the delay before retry number `retry`, racing `signal`.
///
/// Without a configured delay this is a non-blocking check of `signal`. With one, the signal
/// is polled first so an already-done signal always wins over a zero-length sleep.
async fn wait_before_retry<E>(
    signal: &CancelSignal,
    policy: &RetryPolicy<E>,
    retry: u32,
) -> Result<(), Interrupted> {
    let Some(delay) = policy.delay_for(retry) else {
        return signal.err().map_or(Ok(()), Err);
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(retry, ?delay, "Sleeping before the next attempt");

    let done = pin!(signal.done());
    let elapsed = pin!(tokio::time::sleep(delay));
    match future::select(done, elapsed).await {
        Either::Left((interrupted, _)) => Err(interrupted),
        Either::Right(_) => Ok(()),
    }
}
