//! # Runtime events emitted by the polling engine.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Lifecycle events**: operation flow (starting, iteration, cancellation observed)
//! - **Terminal events**: faults and the resolved outcome
//!
//! The [`Event`] struct carries additional metadata such as timestamps, operation name,
//! iteration index, timing and the diagnostic probe text.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use pollvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::PollIteration)
//!     .with_operation("slew")
//!     .with_iteration(3)
//!     .with_delay(Duration::from_millis(95))
//!     .with_detail("ra=10.2h dec=+41.3");
//!
//! assert_eq!(ev.kind, EventKind::PollIteration);
//! assert_eq!(ev.operation.as_deref(), Some("slew"));
//! assert_eq!(ev.delay_ms, Some(95));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Poll loop is about to call the initiator.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `delay_ms`: target interval (ms)
    OperationStarting,

    /// Initiator returned an error; no predicate evaluation happens.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `reason`: `initiator_fault`
    /// - `detail`: error message
    InitiatorFailed,

    /// Predicate reported "still running"; the loop will sleep.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `iteration`: 1-based evaluation index
    /// - `elapsed_ms`: time since polling began (ms)
    /// - `delay_ms`: recommended sleep before the next evaluation (ms)
    /// - `detail`: diagnostic probe text, if any
    PollIteration,

    /// Predicate returned an error; the loop ends.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `iteration`: failing evaluation index
    /// - `reason`: `predicate_fault`
    /// - `detail`: error message
    PredicateFailed,

    /// Poll loop saw the cancellation signal and stopped polling.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `iteration`: last evaluation index
    /// - `elapsed_ms`: time since polling began (ms)
    CancellationObserved,

    /// Outcome of the invocation was resolved.
    ///
    /// Sets:
    /// - `operation`: operation name
    /// - `reason`: outcome label (`completed`, `cancelled` or an error label)
    /// - `detail`: error message for faults
    /// - `iteration`: evaluations performed (completed outcomes only)
    /// - `elapsed_ms`: wall time of the whole invocation (ms)
    OutcomeResolved,
}

/// Engine event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the operation.
    pub operation: Option<Arc<str>>,
    /// Predicate evaluation index (starting from 1).
    pub iteration: Option<u32>,
    /// Elapsed time in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Delay or interval in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Short machine-friendly reason (error labels, outcome labels).
    pub reason: Option<Arc<str>>,
    /// Human-readable detail (probe text, error messages).
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            operation: None,
            iteration: None,
            elapsed_ms: None,
            delay_ms: None,
            reason: None,
            detail: None,
        }
    }

    /// Attaches an operation name.
    #[inline]
    pub fn with_operation(mut self, name: impl Into<Arc<str>>) -> Self {
        self.operation = Some(name.into());
        self
    }

    /// Attaches an evaluation index.
    #[inline]
    pub fn with_iteration(mut self, n: u32) -> Self {
        self.iteration = Some(n);
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a reason label.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a human-readable detail.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[inline]
    pub fn is_iteration(&self) -> bool {
        matches!(self.kind, EventKind::PollIteration)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::OperationStarting);
        let b = Event::new(EventKind::OperationStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_durations_saturate_at_u32() {
        let ev = Event::new(EventKind::PollIteration).with_elapsed(Duration::from_secs(u64::MAX));
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }
}
