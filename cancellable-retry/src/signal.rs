//! `CancelSignal` lets the owner of a retry run stop it between attempts.

use std::pin::pin;
use std::time::Duration;

use futures::future::{self, Either};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::Interrupted;

/// An externally owned cancellation signal, observed by the executor between attempts.
///
/// The signal is done once its token is cancelled or its deadline (if any) has passed, and it
/// stays done from then on. Clones share the same token, so cancelling any clone cancels them
/// all. Independent runs should be given independent signals, or [children](Self::child) of a
/// common parent.
///
/// ```
/// use cancellable_retry::{CancelSignal, Interrupted};
///
/// let signal = CancelSignal::new();
/// assert_eq!(signal.err(), None);
///
/// signal.cancel();
/// assert_eq!(signal.err(), Some(Interrupted::Cancelled));
/// ```
#[derive(Debug, Clone)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A signal that is only done once [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Returns a copy of this signal that is also done once `deadline` is reached.
    ///
    /// An earlier deadline already carried by the signal is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// Returns a copy of this signal that is also done `timeout` from now.
    ///
    /// A timeout too large to be represented as an instant adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derive a signal that is done whenever this one is, but that can be cancelled on its own
    /// without affecting this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel the signal and every signal derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the signal is done, either cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Non-blocking observation: why the signal is done, or `None` if it is not.
    ///
    /// Explicit cancellation wins over an expired deadline.
    pub fn err(&self) -> Option<Interrupted> {
        if self.token.is_cancelled() {
            return Some(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interrupted::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the signal is done, with the reason.
    pub async fn done(&self) -> Interrupted {
        if let Some(reason) = self.err() {
            return reason;
        }
        let Some(deadline) = self.deadline else {
            self.token.cancelled().await;
            return Interrupted::Cancelled;
        };
        let cancelled = pin!(self.token.cancelled());
        let expired = pin!(sleep_until(deadline));
        match future::select(cancelled, expired).await {
            Either::Left(_) => Interrupted::Cancelled,
            Either::Right(_) => Interrupted::DeadlineExceeded,
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CancellationToken> for CancelSignal {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}
