//! # Engine: run one operation to a resolved outcome.
//!
//! Spawns the poll loop and the watchdog, waits (without busy-waiting) for the first
//! of them to report to the finish slot, then resolves the [`Outcome`].
//!
//! ## Flow
//! ```text
//! drive(request, cancel)
//!   ├─► spawn poll_loop  (holds FinishGuard → reports PollLoop + sets `done` on exit)
//!   ├─► spawn watchdog   (ticks every cadence → reports Watchdog on cancel/done)
//!   ├─► await first lane
//!   │     ├─ PollLoop, or Watchdog after `done` ──► join poll loop → PollState::Finished
//!   │     └─ Watchdog while loop still running   ──► detach loop   → PollState::Running
//!   ├─► resolve(state, cancel.is_cancelled())
//!   ├─► info!(outcome)
//!   └─► publish OutcomeResolved
//! ```
//!
//! ## Rules
//! - Exactly **one** outcome per invocation
//! - The poll loop task is **never aborted**; a detached loop exits on its next
//!   cancellation check
//! - The watchdog exits within one cadence after the poll loop finishes

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollConfig;
use crate::core::poll_loop::{LoopContext, poll_loop};
use crate::core::race::{FinishGuard, Lane, finish_slot};
use crate::core::resolver::{PollState, resolve};
use crate::core::watchdog::watchdog;
use crate::events::{Event, EventKind};
use crate::observers::{Observe, ObserverSet};
use crate::operations::PollRequest;
use crate::outcome::Outcome;

/// Drives `request` until its predicate reports completion, it faults, or `cancel` is set.
///
/// This is the one-shot entry point: it uses [`PollConfig::default`] and, if given, a
/// single observer which is flushed before returning. For many operations sharing one
/// configuration use [`Poller`](crate::Poller).
///
/// There is no implicit timeout. Wrap the token with
/// [`cancel_after`](crate::cancel_after) to bound the wait.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use tokio_util::sync::CancellationToken;
/// use pollvisor::{OperationFn, PollRequest, run_until_complete};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let polls = Arc::new(AtomicU32::new(0));
/// let p = polls.clone();
/// let op = OperationFn::new(
///     "close-shutter",
///     || Ok(()),
///     move || Ok(p.fetch_add(1, Ordering::SeqCst) < 2),
/// );
///
/// let token = CancellationToken::new();
/// let outcome = run_until_complete(PollRequest::from_millis(op, 10), &token, None).await;
/// let report = outcome.into_result().expect("shutter closed");
/// assert_eq!(report.iterations, 3);
/// # }
/// ```
pub async fn run_until_complete(
    request: PollRequest,
    cancel: &CancellationToken,
    observer: Option<Arc<dyn Observe>>,
) -> Outcome {
    let observers = Arc::new(ObserverSet::new(observer.into_iter().collect()));
    let outcome = drive(request, cancel, &PollConfig::default(), Arc::clone(&observers)).await;
    flush(&observers).await;
    outcome
}

/// Runs one request with the given config and observer fan-out.
pub(crate) async fn drive(
    request: PollRequest,
    cancel: &CancellationToken,
    cfg: &PollConfig,
    observers: Arc<ObserverSet>,
) -> Outcome {
    let (op, interval) = request.into_parts();
    let name: Arc<str> = Arc::from(op.name());
    let started = Instant::now();

    let (slot, line) = finish_slot();
    let done = CancellationToken::new();

    let guard = FinishGuard::new(slot.clone(), done.clone());
    let ctx = LoopContext {
        observers: Arc::clone(&observers),
        trace_iterations: cfg.trace_iterations,
        probe: cfg.probe_enabled(),
    };
    let loop_cancel = cancel.clone();
    let poll = tokio::spawn(async move {
        let _guard = guard;
        poll_loop(op, interval, loop_cancel, ctx).await
    });
    tokio::spawn(watchdog(
        cancel.clone(),
        done.clone(),
        cfg.watchdog_cadence_clamped(),
        slot,
    ));

    let state = match line.first().await {
        Some(Lane::Watchdog) if !done.is_cancelled() => {
            debug!(operation = %name, "poll loop detached; it exits on its next cancellation check");
            PollState::Running
        }
        _ => PollState::Finished(poll.await),
    };

    let outcome = resolve(state, cancel.is_cancelled());
    let elapsed = started.elapsed();
    info!(operation = %name, outcome = outcome.as_label(), ?elapsed, "operation resolved");

    let mut ev = Event::new(EventKind::OutcomeResolved)
        .with_operation(name)
        .with_reason(outcome.as_label())
        .with_elapsed(elapsed);
    match &outcome {
        Outcome::Completed(report) => ev = ev.with_iteration(report.iterations),
        Outcome::Faulted(err) => ev = ev.with_detail(err.to_string()),
        Outcome::Cancelled => {}
    }
    observers.emit(ev);

    outcome
}

/// Flushes queued events and stops the observer workers.
///
/// A detached poll loop may still hold a clone of the set; it can no longer emit
/// once this returns.
pub(crate) async fn flush(observers: &ObserverSet) {
    observers.shutdown().await;
}
