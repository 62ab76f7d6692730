//! # Event observers for polled operations.
//!
//! This module provides the [`Observe`] trait, the [`ObserverSet`] fan-out and
//! the built-in [`LogWriter`].
//!
//! ```text
//! poll_loop ── emit(Event) ──► ObserverSet ──┬──► LogWriter (tracing)
//!                                            ├──► Metrics
//!                                            └──► Custom
//! ```

mod log;
mod observer;
mod observer_set;

pub use log::LogWriter;
pub use observer::Observe;
pub use observer_set::ObserverSet;
