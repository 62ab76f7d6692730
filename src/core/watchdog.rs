//! # Watchdog: fixed-cadence check of cancellation and poll-loop lifecycle.
//!
//! The poll loop only looks at the cancellation token between evaluations, so with a
//! long interval a cancelled caller could stay blocked for a whole sleep. The watchdog
//! ticks on its own short cadence and reports to the finish slot as soon as either:
//! - the caller's cancellation token is set, or
//! - the poll loop has finished (its `done` token is set).
//!
//! It never aborts the poll loop task; exit is cooperative on both sides.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::core::race::{FinishSlot, Lane};

/// Why the watchdog stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatchdogExit {
    Cancelled,
    PollFinished,
}

/// Ticks every `cadence` until cancellation or poll-loop completion, then reports.
///
/// The first tick fires immediately, so a token that is already cancelled is seen
/// without waiting a full cadence.
pub(crate) async fn watchdog(
    cancel: CancellationToken,
    done: CancellationToken,
    cadence: Duration,
    slot: FinishSlot,
) -> WatchdogExit {
    let mut ticker = time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit = loop {
        ticker.tick().await;
        if done.is_cancelled() {
            break WatchdogExit::PollFinished;
        }
        if cancel.is_cancelled() {
            break WatchdogExit::Cancelled;
        }
    };

    trace!(?exit, "watchdog exiting");
    slot.finish(Lane::Watchdog);
    exit
}
