//! # Observe: user-facing event handlers
//!
//! The [`Observe`] trait is the main **extension point** for tracing polled operations.
//! Every [`Event`] emitted by the engine flows into observers.
//!
//! Implementing your own observer allows you to plug in:
//! - metrics export;
//! - per-iteration device traces;
//! - structured logging.
//!
//! ```text
//! Event flow:
//!   poll_loop / engine ── emit(Event) ──► ObserverSet ──► [queue] ──► worker ──► Observe::on_event(&Event)
//! ```
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do **not** block the poll loop.
//! - Each observer **declares** its preferred queue capacity via
//!   [`Observe::queue_capacity`]. If a queue overflows, events for that
//!   observer are **dropped** (warn).
//! - A panicking observer never changes the outcome of an operation.
//!
//! # Example: custom observer
//! ```no_run
//! use pollvisor::{Observe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct SlewTrace;
//!
//! #[async_trait]
//! impl Observe for SlewTrace {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::PollIteration {
//!             println!("#{:?} {:?}", event.iteration, event.detail);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "slew-trace" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event observers.
///
/// Called from an observer-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single event for this observer.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this observer's queue.
    ///
    /// On overflow, events for this observer are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
