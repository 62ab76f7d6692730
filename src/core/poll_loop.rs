//! # Poll loop: initiate once, then evaluate the completion predicate.
//!
//! ## Flow
//! ```text
//! publish OperationStarting
//! initiate() ── Err ──► publish InitiatorFailed ──► return Initiator fault
//! loop {
//!   ├─► iteration += 1
//!   ├─► is_running() ── Err ──► publish PredicateFailed ──► return Predicate fault
//!   ├─► false        ──► return Completed
//!   ├─► cancelled?   ──► publish CancellationObserved ──► return Cancelled
//!   ├─► delay = timing.record(since last mark)
//!   ├─► publish PollIteration (+ probe text)
//!   └─► sleep(delay)   (yield when delay == 0)
//! }
//! ```
//!
//! ## Rules
//! - The initiator runs **exactly once**, strictly before the first evaluation
//! - The predicate is evaluated **at least once**
//! - Cancellation is checked only between evaluations; an in-flight evaluation or
//!   sleep always runs to completion
//! - The device is never told to abort; that is the caller's job

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::timing::LoopTiming;
use crate::error::{PollError, panic_message};
use crate::events::{Event, EventKind};
use crate::observers::ObserverSet;
use crate::operations::Operation;
use crate::outcome::PollReport;

/// Tracing knobs and the observer fan-out for one loop.
pub(crate) struct LoopContext {
    pub observers: Arc<ObserverSet>,
    pub trace_iterations: bool,
    pub probe: bool,
}

/// How the loop ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopExit {
    Completed(PollReport),
    Cancelled { iterations: u32 },
}

/// Drives `op` until its predicate reports completion or `cancel` is observed.
pub(crate) async fn poll_loop(
    mut op: Box<dyn Operation>,
    interval: Duration,
    cancel: CancellationToken,
    ctx: LoopContext,
) -> Result<LoopExit, PollError> {
    let name: Arc<str> = Arc::from(op.name());

    ctx.observers.emit(
        Event::new(EventKind::OperationStarting)
            .with_operation(name.clone())
            .with_delay(interval),
    );
    debug!(operation = %name, ?interval, "initiating operation");

    if let Err(source) = op.initiate().await {
        ctx.observers.emit(
            Event::new(EventKind::InitiatorFailed)
                .with_operation(name.clone())
                .with_reason("initiator_fault")
                .with_detail(source.to_string()),
        );
        return Err(PollError::Initiator { source });
    }

    let mut timing = LoopTiming::new(interval);
    let started = Instant::now();
    let mut mark = started;
    let mut iteration: u32 = 0;

    loop {
        iteration = iteration.saturating_add(1);

        let running = match op.is_running().await {
            Ok(running) => running,
            Err(source) => {
                ctx.observers.emit(
                    Event::new(EventKind::PredicateFailed)
                        .with_operation(name.clone())
                        .with_iteration(iteration)
                        .with_reason("predicate_fault")
                        .with_detail(source.to_string()),
                );
                return Err(PollError::Predicate { iteration, source });
            }
        };

        if !running {
            return Ok(LoopExit::Completed(PollReport {
                iterations: iteration,
                elapsed: started.elapsed(),
            }));
        }

        if cancel.is_cancelled() {
            ctx.observers.emit(
                Event::new(EventKind::CancellationObserved)
                    .with_operation(name.clone())
                    .with_iteration(iteration)
                    .with_elapsed(started.elapsed()),
            );
            debug!(operation = %name, iteration, "cancellation observed; leaving poll loop");
            return Ok(LoopExit::Cancelled {
                iterations: iteration,
            });
        }

        let now = Instant::now();
        let delay = timing.record(now - mark);
        mark = now;

        if ctx.trace_iterations {
            let detail = if ctx.probe {
                probe_detail(op.as_mut()).await
            } else {
                None
            };
            trace!(operation = %name, iteration, ?delay, detail = ?detail, "still running");

            let mut ev = Event::new(EventKind::PollIteration)
                .with_operation(name.clone())
                .with_iteration(iteration)
                .with_elapsed(now - started)
                .with_delay(delay);
            if let Some(detail) = detail {
                ev = ev.with_detail(detail);
            }
            ctx.observers.emit(ev);
        }

        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            time::sleep(delay).await;
        }
    }
}

/// Runs the diagnostic probe, discarding errors and panics.
async fn probe_detail(op: &mut dyn Operation) -> Option<String> {
    let probed = AssertUnwindSafe(op.describe()).catch_unwind().await;
    match probed {
        Ok(Ok(detail)) => detail,
        Ok(Err(err)) => {
            debug!(operation = op.name(), error = %err, "diagnostic probe failed");
            None
        }
        Err(panic) => {
            debug!(
                operation = op.name(),
                panic = %panic_message(&*panic),
                "diagnostic probe panicked"
            );
            None
        }
    }
}
