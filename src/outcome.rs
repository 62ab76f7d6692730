//! # Outcome of one polled operation.
//!
//! [`Outcome`] is the tri-state result produced exactly once per invocation:
//! `Completed`, `Faulted` or `Cancelled`. Use [`Outcome::into_result`] to propagate
//! it with `?`.

use std::time::Duration;

use crate::error::PollError;

/// Statistics of an operation that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    /// Number of predicate evaluations, including the final one that reported completion.
    pub iterations: u32,
    /// Time from the first predicate evaluation to completion.
    pub elapsed: Duration,
}

/// Final result of one invocation.
#[derive(Debug)]
pub enum Outcome {
    /// The predicate reported that the device operation finished.
    Completed(PollReport),
    /// The initiator or the predicate failed (or panicked).
    Faulted(PollError),
    /// Cancellation was observed before the predicate reported completion.
    Cancelled,
}

impl Outcome {
    /// Returns a short stable label for logs.
    ///
    /// ```
    /// use pollvisor::{Outcome, PollError};
    ///
    /// assert_eq!(Outcome::Cancelled.as_label(), "cancelled");
    /// let fault = Outcome::Faulted(PollError::Initiator { source: "offline".into() });
    /// assert_eq!(fault.as_label(), "initiator_fault");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Completed(_) => "completed",
            Outcome::Faulted(err) => err.as_label(),
            Outcome::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    #[inline]
    pub fn is_faulted(&self) -> bool {
        matches!(self, Outcome::Faulted(_))
    }

    /// Converts into a `Result`, mapping cancellation to [`PollError::Cancelled`].
    pub fn into_result(self) -> Result<PollReport, PollError> {
        match self {
            Outcome::Completed(report) => Ok(report),
            Outcome::Faulted(err) => Err(err),
            Outcome::Cancelled => Err(PollError::Cancelled),
        }
    }
}

impl From<Outcome> for Result<PollReport, PollError> {
    fn from(outcome: Outcome) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_maps_cancellation() {
        let err = Outcome::Cancelled.into_result().unwrap_err();
        assert!(err.is_cancelled());

        let report = PollReport {
            iterations: 2,
            elapsed: Duration::from_millis(100),
        };
        assert_eq!(Outcome::Completed(report).into_result().unwrap(), report);
    }
}
