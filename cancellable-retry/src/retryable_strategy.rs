/// A strategy deciding whether an attempt's outcome should be retried.
///
/// The strategy sees the error of the attempt that just finished, or `None` if the attempt
/// succeeded. Returning `true` asks the executor for another attempt (if any are left);
/// returning `false` makes the current outcome final.
///
/// Any `Fn(Option<&E>) -> bool` closure is a strategy:
///
/// ```
/// use cancellable_retry::RetryPolicy;
///
/// // Retry timeouts, and also retry "successful" calls that returned nothing useful yet.
/// let policy = RetryPolicy::<std::io::Error>::new(5).retry_on(|err: Option<&std::io::Error>| {
///     match err {
///         Some(err) => err.kind() == std::io::ErrorKind::TimedOut,
///         None => false,
///     }
/// });
/// assert!(policy.is_enabled());
/// ```
pub trait RetryableStrategy<E>: Send + Sync {
    fn handle(&self, error: Option<&E>) -> bool;
}

impl<E, F> RetryableStrategy<E> for F
where
    F: Fn(Option<&E>) -> bool + Send + Sync,
{
    fn handle(&self, error: Option<&E>) -> bool {
        (self)(error)
    }
}

/// The default [`RetryableStrategy`]: every error is transient, success is final.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRetryableStrategy;

impl<E> RetryableStrategy<E> for DefaultRetryableStrategy {
    fn handle(&self, error: Option<&E>) -> bool {
        error.is_some()
    }
}

/// Retries only the errors matching a predicate. Success is final.
///
/// Built with [`on_error`].
#[derive(Debug, Clone, Copy)]
pub struct OnError<F>(F);

/// Retry the errors for which `predicate` returns true.
///
/// ```
/// use cancellable_retry::{on_error, RetryPolicy};
/// use std::io::{Error, ErrorKind};
///
/// let policy = RetryPolicy::new(3).retry_on(on_error(|err: &Error| {
///     matches!(err.kind(), ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted)
/// }));
/// assert_eq!(policy.max_attempts(), 3);
/// ```
pub fn on_error<E, F>(predicate: F) -> OnError<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    OnError(predicate)
}

impl<E, F> RetryableStrategy<E> for OnError<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn handle(&self, error: Option<&E>) -> bool {
        error.map_or(false, &self.0)
    }
}
