//! Plugs a growing delay into a policy and stops retrying once the caller gives up.
//!
//! The operation always fails. With three attempts the delay function is called twice, with
//! `1` and then `2`. A second run allows many more attempts but only half a second overall,
//! so the signal's deadline ends it.

use cancellable_retry::{retry, CancelSignal, DefaultRetryableStrategy, Interrupted, RetryPolicy};
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum AppError {
    #[error("always failing")]
    AlwaysFailing,
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let policy = RetryPolicy::new(3).retry_on(DefaultRetryableStrategy);
    let backoff = policy.with_delay_fn(|retry| {
        println!("delay fn called with argument {}", retry);
        // Grow the delay with every attempt made.
        Duration::from_millis(u64::from(retry))
    });

    let res = retry(&CancelSignal::new(), &backoff, || async {
        Err::<(), _>(AppError::AlwaysFailing)
    })
    .await;
    println!("error: {:?}", res.err());

    let patient = RetryPolicy::new(100)
        .retry_on(DefaultRetryableStrategy)
        .with_delay_fn(|retry| Duration::from_millis(50) * retry.min(4));
    let signal = CancelSignal::new().with_timeout(Duration::from_millis(500));
    let res = retry(&signal, &patient, || async {
        Err::<(), _>(AppError::AlwaysFailing)
    })
    .await;
    match res {
        Err(AppError::Interrupted(reason)) => println!("gave up: {}", reason),
        other => println!("unexpected: {:?}", other),
    }
}
