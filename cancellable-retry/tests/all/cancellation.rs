use cancellable_retry::{
    on_error, retry, retry_with_value, CancelSignal, CancellationToken, DefaultRetryableStrategy,
    Interrupted, RetryPolicy,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::helpers::{assert_roughly, FlakyOperation, TestError};

#[tokio::test]
async fn first_attempt_runs_despite_cancelled_signal() {
    let operation = FlakyOperation::always_failing();
    let policy = RetryPolicy::new(10).retry_on(DefaultRetryableStrategy);
    let signal = CancelSignal::new();
    signal.cancel();

    let res = retry_with_value(&signal, &policy, || operation.call()).await;

    assert_eq!(operation.calls(), 1);
    assert_eq!(res, Err(TestError::Interrupted(Interrupted::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn cancelled_signal_beats_delay() {
    let operation = FlakyOperation::always_failing();
    let policy = RetryPolicy::new(10)
        .retry_on(DefaultRetryableStrategy)
        .with_delay(Duration::from_secs(5));
    let signal = CancelSignal::new();
    signal.cancel();
    let started = Instant::now();

    let res = retry_with_value(&signal, &policy, || operation.call()).await;

    assert_eq!(operation.calls(), 1);
    assert_eq!(res, Err(TestError::Interrupted(Interrupted::Cancelled)));
    assert_roughly(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn final_outcome_wins_over_cancelled_signal() {
    let policy = RetryPolicy::new(10).retry_on(on_error(TestError::is_transient));
    let signal = CancelSignal::new();
    signal.cancel();

    let succeeding = FlakyOperation::new(0);
    let res = retry_with_value(&signal, &policy, || succeeding.call()).await;
    assert_eq!(res, Ok(1));

    let fatal = FlakyOperation::always_failing().fatal_on(1);
    let res = retry_with_value(&signal, &policy, || fatal.call()).await;
    assert_eq!(res, Err(TestError::Fatal(1)));
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_pending_delay() {
    let operation = FlakyOperation::always_failing();
    let policy = RetryPolicy::new(3)
        .retry_on(DefaultRetryableStrategy)
        .with_delay(Duration::from_secs(60));
    let signal = CancelSignal::new();
    let canceller = signal.clone();
    let started = Instant::now();

    let (res, ()) = tokio::join!(
        retry_with_value(&signal, &policy, || operation.call()),
        async move {
            sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        }
    );

    assert_eq!(res, Err(TestError::Interrupted(Interrupted::Cancelled)));
    assert_eq!(operation.calls(), 1);
    assert_roughly(started.elapsed(), Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn deadline_stops_retrying() {
    let operation = FlakyOperation::always_failing();
    let policy = RetryPolicy::new(10)
        .retry_on(DefaultRetryableStrategy)
        .with_delay(Duration::from_millis(10));
    let signal = CancelSignal::new().with_timeout(Duration::from_millis(25));

    let res = retry_with_value(&signal, &policy, || operation.call()).await;

    assert_eq!(
        res,
        Err(TestError::Interrupted(Interrupted::DeadlineExceeded))
    );
    assert_eq!(operation.calls(), 3);
    assert_roughly(operation.call_times()[2], Duration::from_millis(20));
}

#[tokio::test]
async fn cancellation_during_attempt_applies_at_next_wait() {
    let policy = RetryPolicy::new(5).retry_on(DefaultRetryableStrategy);
    let signal = CancelSignal::new();
    let mut calls = 0;

    let res = retry(&signal, &policy, || {
        calls += 1;
        signal.cancel();
        async { Err(TestError::Transient(1)) }
    })
    .await;

    assert_eq!(calls, 1);
    assert_eq!(res, Err(TestError::Interrupted(Interrupted::Cancelled)));
}

#[tokio::test]
async fn cancellation_during_successful_attempt_is_ignored() {
    let policy = RetryPolicy::new(5).retry_on(DefaultRetryableStrategy);
    let signal = CancelSignal::new();

    let res = retry_with_value(&signal, &policy, || {
        signal.cancel();
        async { Ok::<_, TestError>("payload") }
    })
    .await;

    assert_eq!(res, Ok("payload"));
}

#[tokio::test(start_paused = true)]
async fn sibling_runs_cancel_independently() {
    let parent = CancelSignal::from(CancellationToken::new());
    let cancelled = parent.child();
    let untouched = parent.child();
    cancelled.cancel();

    let policy = RetryPolicy::new(3)
        .retry_on(DefaultRetryableStrategy)
        .with_delay(Duration::from_millis(1));
    let first = FlakyOperation::new(2);
    let second = FlakyOperation::new(2);

    let (a, b) = tokio::join!(
        retry_with_value(&cancelled, &policy, || first.call()),
        retry_with_value(&untouched, &policy, || second.call()),
    );

    assert_eq!(a, Err(TestError::Interrupted(Interrupted::Cancelled)));
    assert_eq!(b, Ok(3));
    assert!(!parent.is_done());
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_lets_retries_run() {
    let operation = FlakyOperation::new(2);
    let policy = RetryPolicy::new(5)
        .retry_on(DefaultRetryableStrategy)
        .with_delay(Duration::from_millis(1));
    let signal = CancelSignal::new().with_timeout(Duration::MAX);

    let res = retry_with_value(&signal, &policy, || operation.call()).await;

    assert_eq!(res, Ok(3));
    assert!(!signal.is_done());
}

#[tokio::test]
async fn interrupted_run_drops_previous_value() {
    let operation = FlakyOperation::new(0);
    let policy = RetryPolicy::new(3).retry_on(|_: Option<&TestError>| true);
    let signal = CancelSignal::new();
    signal.cancel();

    let res = retry_with_value(&signal, &policy, || operation.call()).await;

    assert_eq!(operation.calls(), 1);
    assert_eq!(res, Err(TestError::Interrupted(Interrupted::Cancelled)));
}
