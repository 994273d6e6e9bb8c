//! Retries a call that fails twice before succeeding, first with too few attempts and then
//! with enough of them.
//!
//! Run with `RUST_LOG=cancellable_retry=trace` to see the executor's own events.

use cancellable_retry::{
    retry, retry_with_value, CancelSignal, DefaultRetryableStrategy, RetryPolicy,
};
use std::cell::Cell;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let signal = CancelSignal::new();

    let mut n = 0;
    let res: anyhow::Result<u32> = retry_with_value(
        &signal,
        &RetryPolicy::new(10).retry_on(DefaultRetryableStrategy),
        || {
            n += 1;
            let n = n;
            async move {
                if n < 3 {
                    println!("attempt {}, failing", n);
                    anyhow::bail!("boom");
                }
                Ok(n)
            }
        },
    )
    .await;
    println!("value: {:?}", res);

    let policy = RetryPolicy::new(2).retry_on(DefaultRetryableStrategy);
    let attempts = Cell::new(0);
    let flaky = || {
        attempts.set(attempts.get() + 1);
        let n = attempts.get();
        async move {
            if n < 3 {
                println!("attempt {}, failing", n);
                anyhow::bail!("boom");
            }
            println!("attempt {}, succeeding", n);
            Ok(())
        }
    };
    let res: anyhow::Result<()> = retry(&signal, &policy, &flaky).await;
    println!("error: {:?}", res.err());

    // Policies are values: build a new one with more attempts rather than editing the old one.
    attempts.set(0);
    let policy = RetryPolicy::new(10).retry_on(DefaultRetryableStrategy);
    println!("\nafter adjustments:");
    let res: anyhow::Result<()> = retry(&signal, &policy, &flaky).await;
    println!("error: {:?}", res.err());
}
