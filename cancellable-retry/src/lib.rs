//! Retry fallible async operations under a [`RetryPolicy`], stopping early when a
//! [`CancelSignal`] fires.
//!
//! A policy bundles the maximum number of attempts, a [`RetryableStrategy`] that classifies
//! each outcome, and the delay between attempts. The executor ([`retry`] and
//! [`retry_with_value`]) calls the operation, asks the strategy whether to go again and waits
//! out the delay while watching the signal:
//!
//! ```
//! use cancellable_retry::{retry_with_value, CancelSignal, DefaultRetryableStrategy, RetryPolicy};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! // At most 5 calls, linear backoff: 10ms, 20ms, 30ms, 40ms.
//! let policy = RetryPolicy::new(5)
//!     .retry_on(DefaultRetryableStrategy)
//!     .with_delay_fn(|retry| Duration::from_millis(10) * retry);
//!
//! // Give up waiting after one second, whatever the policy says.
//! let signal = CancelSignal::new().with_timeout(Duration::from_secs(1));
//!
//! let mut n = 0;
//! let answer = retry_with_value(&signal, &policy, || {
//!     n += 1;
//!     let n = n;
//!     async move {
//!         if n < 3 {
//!             anyhow::bail!("attempt {} failed", n);
//!         }
//!         Ok(n * 14)
//!     }
//! })
//! .await?;
//!
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```
//!
//! The crate does not ship any backoff algorithm: [`RetryPolicy::with_delay_fn`] is the hook
//! through which callers plug one in.
mod error;
mod executor;
mod policy;
mod retryable_strategy;
mod signal;

pub use error::Interrupted;
pub use executor::{retry, retry_with_value};
pub use policy::{DelayFn, RetryPolicy};
pub use retryable_strategy::{on_error, DefaultRetryableStrategy, OnError, RetryableStrategy};
pub use signal::CancelSignal;
pub use tokio_util::sync::CancellationToken;
