//! # Poll request.
//!
//! Defines [`PollRequest`] the bundle handed to the engine: one [`Operation`] plus the
//! target interval between predicate evaluations.
//!
//! A request can be created:
//! - **Explicitly** with [`PollRequest::new`] or [`PollRequest::from_millis`]
//! - **From config** with [`PollRequest::with_defaults`] (inherit the default interval)
//!
//! A request is consumed by exactly one invocation.

use std::fmt;
use std::time::Duration;

use crate::config::PollConfig;
use crate::operations::operation::Operation;

/// One operation to drive to completion, with its target poll interval.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use pollvisor::{OperationFn, PollConfig, PollRequest};
///
/// let op = OperationFn::new("park", || Ok(()), || Ok(false));
/// let req = PollRequest::from_millis(op, 250);
/// assert_eq!(req.interval(), Duration::from_millis(250));
/// assert_eq!(req.name(), "park");
///
/// let cfg = PollConfig::default();
/// let op = OperationFn::new("unpark", || Ok(()), || Ok(false));
/// assert_eq!(PollRequest::with_defaults(op, &cfg).interval(), cfg.interval);
/// ```
pub struct PollRequest {
    operation: Box<dyn Operation>,
    interval: Duration,
}

impl PollRequest {
    /// Creates a request with an explicit target interval (`0` = busy polling).
    pub fn new(operation: impl Operation, interval: Duration) -> Self {
        Self {
            operation: Box::new(operation),
            interval,
        }
    }

    /// Creates a request with the target interval in milliseconds.
    pub fn from_millis(operation: impl Operation, interval_ms: u64) -> Self {
        Self::new(operation, Duration::from_millis(interval_ms))
    }

    /// Creates a request inheriting the default interval from config.
    pub fn with_defaults(operation: impl Operation, cfg: &PollConfig) -> Self {
        Self::new(operation, cfg.interval)
    }

    /// Returns the operation name.
    pub fn name(&self) -> &str {
        self.operation.name()
    }

    /// Returns the target interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns a new request with updated interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub(crate) fn into_parts(self) -> (Box<dyn Operation>, Duration) {
        (self.operation, self.interval)
    }
}

impl fmt::Debug for PollRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollRequest")
            .field("operation", &self.operation.name())
            .field("interval", &self.interval)
            .finish()
    }
}
