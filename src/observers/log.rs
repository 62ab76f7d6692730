//! # LogWriter - event printer
//!
//! A minimal observer that renders incoming [`Event`]s through `tracing`.
//! Install any `tracing` subscriber to see them.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG pollvisor: [starting] operation="slew" interval_ms=100
//! DEBUG pollvisor: [iteration] operation="slew" n=3 elapsed_ms=201 delay_ms=99 detail="ra=10.2h"
//! DEBUG pollvisor: [cancel-observed] operation="slew" n=4
//!  WARN pollvisor: [initiator-failed] operation="slew" err="device offline"
//!  INFO pollvisor: [resolved] operation="slew" outcome="completed"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let op = e.operation.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::OperationStarting => {
                debug!(target: "pollvisor", "[starting] operation={op:?} interval_ms={:?}", e.delay_ms);
            }
            EventKind::PollIteration => {
                debug!(
                    target: "pollvisor",
                    "[iteration] operation={op:?} n={:?} elapsed_ms={:?} delay_ms={:?} detail={:?}",
                    e.iteration, e.elapsed_ms, e.delay_ms, e.detail
                );
            }
            EventKind::CancellationObserved => {
                debug!(target: "pollvisor", "[cancel-observed] operation={op:?} n={:?}", e.iteration);
            }
            EventKind::InitiatorFailed => {
                warn!(target: "pollvisor", "[initiator-failed] operation={op:?} err={:?}", e.detail);
            }
            EventKind::PredicateFailed => {
                warn!(
                    target: "pollvisor",
                    "[predicate-failed] operation={op:?} n={:?} err={:?}",
                    e.iteration, e.detail
                );
            }
            EventKind::OutcomeResolved => {
                info!(
                    target: "pollvisor",
                    "[resolved] operation={op:?} outcome={:?} elapsed_ms={:?}",
                    e.reason, e.elapsed_ms
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
