use thiserror::Error;

/// Reason a [`CancelSignal`](crate::CancelSignal) is done.
///
/// The executor only reports this when the signal interrupted the wait before a retry. The
/// operation's own errors are always handed back untouched, so callers tell the two apart by
/// giving their error type a `From<Interrupted>` conversion (`anyhow::Error` has one already).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interrupted {
    /// The signal was cancelled explicitly.
    #[error("retry cancelled")]
    Cancelled,
    /// The signal's deadline passed.
    #[error("retry deadline exceeded")]
    DeadlineExceeded,
}

impl Interrupted {
    /// Returns true if the signal was cancelled explicitly.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Interrupted::Cancelled)
    }

    /// Returns true if the signal's deadline passed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Interrupted::DeadlineExceeded)
    }
}
