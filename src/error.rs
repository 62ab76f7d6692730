//! Error types used by the pollvisor engine.
//!
//! This module defines:
//!
//! - [`DeviceError`] - the boxed error type returned by device callbacks.
//! - [`PollError`] - how one invocation failed (or was cancelled).
//!
//! [`PollError`] provides helper methods (`as_label`, `as_message`) for logging/metrics
//! and accessors such as [`PollError::device_error`].

use thiserror::Error;

/// Error produced by a device callback (initiator, predicate or probe).
///
/// Anything that converts into a boxed error works, including plain strings:
/// ```
/// use pollvisor::DeviceError;
///
/// let err: DeviceError = "device offline".into();
/// assert_eq!(err.to_string(), "device offline");
/// ```
pub type DeviceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by one polled operation.
///
/// Fault variants display exactly as the underlying device error, so the caller
/// sees the most specific message. [`PollError::Cancelled`] is kept separate so
/// "stopped on request" can be told apart from "stopped because it broke".
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PollError {
    /// The initiator failed before polling began; the predicate was never evaluated.
    #[error("{source}")]
    Initiator {
        /// Error returned by the initiator.
        source: DeviceError,
    },

    /// The completion predicate failed mid-poll.
    #[error("{source}")]
    Predicate {
        /// 1-based index of the failing evaluation.
        iteration: u32,
        /// Error returned by the predicate.
        source: DeviceError,
    },

    /// A device callback panicked inside the poll worker.
    #[error("poll worker panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The poll worker was stopped by the runtime (shutdown) before it reported,
    /// without the cancellation token being set.
    #[error("poll worker interrupted before reporting")]
    Interrupted,

    /// Cancellation was observed before the predicate reported completion.
    #[error("operation cancelled")]
    Cancelled,
}

impl PollError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use pollvisor::PollError;
    ///
    /// let err = PollError::Initiator { source: "device offline".into() };
    /// assert_eq!(err.as_label(), "initiator_fault");
    /// assert_eq!(PollError::Cancelled.as_label(), "cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::Initiator { .. } => "initiator_fault",
            PollError::Predicate { .. } => "predicate_fault",
            PollError::Panicked { .. } => "worker_panicked",
            PollError::Interrupted => "worker_interrupted",
            PollError::Cancelled => "cancelled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PollError::Initiator { source } => format!("initiator: {source}"),
            PollError::Predicate { iteration, source } => {
                format!("predicate (iteration {iteration}): {source}")
            }
            PollError::Panicked { message } => format!("panicked: {message}"),
            PollError::Interrupted => "interrupted by runtime shutdown".to_string(),
            PollError::Cancelled => "operation cancelled".to_string(),
        }
    }

    /// Returns the underlying device error for the fault variants.
    pub fn device_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            PollError::Initiator { source } | PollError::Predicate { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }

    /// `true` for [`PollError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollError::Cancelled)
    }

    /// `true` for every variant except [`PollError::Cancelled`].
    pub fn is_fault(&self) -> bool {
        !self.is_cancelled()
    }
}

/// Renders a panic payload the way `std` prints it.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
