//! Engine core: polling, racing and outcome resolution.
//!
//! Public API from this module: [`Poller`], [`run_until_complete`], [`cancel_after`],
//! [`cancel_on_shutdown`] and the [`LoopTiming`] accumulator.
//!
//! Internal modules:
//! - [`timing`]: running-average overhead and next sleep;
//! - [`poll_loop`]: initiator once, then predicate evaluations;
//! - [`watchdog`]: fixed-cadence cancellation/lifecycle check;
//! - [`race`]: single-slot "first writer wins" finish channel;
//! - [`resolver`]: fault > cancellation > completion;
//! - [`engine`]: spawns both workers and resolves the outcome;
//! - [`poller`]: long-lived facade sharing config and observers;
//! - [`deadline`]: timeout-driven cancellation tokens;
//! - [`shutdown`]: OS signal → cancellation.

mod deadline;
mod engine;
mod poll_loop;
mod poller;
mod race;
mod resolver;
mod shutdown;
mod timing;
mod watchdog;

pub use deadline::cancel_after;
pub use engine::run_until_complete;
pub use poller::Poller;
pub use shutdown::cancel_on_shutdown;
pub use timing::LoopTiming;
