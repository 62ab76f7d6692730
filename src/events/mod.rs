//! Engine events: types.
//!
//! This module groups the event **data model** emitted by the poll loop and the
//! engine. Events are delivered to observers through
//! [`ObserverSet`](crate::observers::ObserverSet).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `poll_loop` (lifecycle and iterations), `engine` (resolved outcome).
//! - **Consumers**: user [`Observe`](crate::Observe) implementations, [`LogWriter`](crate::LogWriter).

mod event;

pub use event::{Event, EventKind};
