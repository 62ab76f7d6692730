//! # pollvisor
//!
//! **Pollvisor** turns "fire a long-running device operation, then poll a completion
//! flag" into a single cancellable awaitable with adaptive poll-interval correction and
//! uniform fault/cancellation semantics.
//!
//! A device capability (connect, expose, slew, move a filter wheel, open a cover, ...)
//! supplies only an initiator, a completion predicate and an optional diagnostic probe.
//! The engine does the rest.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        caller ──► run_until_complete(request, &token) / Poller::run
//!                                   │
//!                ┌──────────────────┴───────────────────┐
//!                ▼                                      ▼
//!     ┌─────────────────────┐                ┌─────────────────────┐
//!     │      poll loop      │                │      watchdog       │
//!     │ initiate() once     │                │ tick every cadence  │
//!     │ loop is_running()   │                │ cancelled? done?    │
//!     │ sleep(LoopTiming)   │                │                     │
//!     └──────────┬──────────┘                └──────────┬──────────┘
//!                │ FinishGuard (drop)                   │ exit
//!                └───────────────►[finish slot: 1]◄─────┘
//!                                   │ first lane wins
//!                                   ▼
//!                         resolve(fault > cancelled > completed)
//!                                   │
//!                                   ▼
//!                         info! + OutcomeResolved ──► Outcome
//! ```
//!
//! ### Timing
//! The poll loop keeps a running average of the time an iteration spends *outside*
//! its sleep (predicate I/O, tracing) and subtracts it from the target interval, so
//! the loop period converges to the requested interval. See [`LoopTiming`].
//!
//! ### Cancellation
//! Cooperative only. The token is checked by the poll loop between evaluations and by
//! the watchdog on its own short cadence, whichever sees it first. In-flight device
//! calls always run to completion; the device is never told to abort.
//!
//! ## Features
//! | Area              | Description                                                     | Key types / functions                       |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Operations**    | Describe a device capability as initiator/predicate/probe.      | [`Operation`], [`OperationFn`], [`PollRequest`] |
//! | **Engine**        | Drive one operation to a resolved outcome.                      | [`run_until_complete`], [`Poller`]          |
//! | **Outcomes**      | Completed / Faulted / Cancelled, convertible to `Result`.       | [`Outcome`], [`PollReport`], [`PollError`]  |
//! | **Observers**     | Per-iteration traces and lifecycle events.                      | [`Observe`], [`Event`], [`LogWriter`]       |
//! | **Cancellation**  | Deadlines and OS signals as cancellation sources.               | [`cancel_after`], [`cancel_on_shutdown`]    |
//! | **Configuration** | Watchdog cadence, default interval, tracing knobs.              | [`PollConfig`]                              |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use pollvisor::{LogWriter, OperationFn, PollRequest, run_until_complete};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), pollvisor::PollError> {
//!     let slewing = Arc::new(AtomicBool::new(false));
//!
//!     // Simulated mount: the slew ends 250ms after it starts.
//!     let (start, poll) = (slewing.clone(), slewing.clone());
//!     let slew = OperationFn::new(
//!         "slew",
//!         move || {
//!             start.store(true, Ordering::SeqCst);
//!             let done = start.clone();
//!             tokio::spawn(async move {
//!                 tokio::time::sleep(Duration::from_millis(250)).await;
//!                 done.store(false, Ordering::SeqCst);
//!             });
//!             Ok(())
//!         },
//!         move || Ok(poll.load(Ordering::SeqCst)),
//!     );
//!
//!     let token = CancellationToken::new();
//!     let report = run_until_complete(
//!         PollRequest::from_millis(slew, 100),
//!         &token,
//!         Some(Arc::new(LogWriter::new())),
//!     )
//!     .await
//!     .into_result()?;
//!
//!     assert!(report.iterations >= 3);
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod observers;
mod operations;
mod outcome;

// ---- Public re-exports ----

pub use config::PollConfig;
pub use core::{LoopTiming, Poller, cancel_after, cancel_on_shutdown, run_until_complete};
pub use error::{DeviceError, PollError};
pub use events::{Event, EventKind};
pub use observers::{LogWriter, Observe, ObserverSet};
pub use operations::{Operation, OperationFn, PollRequest};
pub use outcome::{Outcome, PollReport};
