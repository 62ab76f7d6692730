//! # Non-blocking event fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] - distributes events to multiple observers
//! concurrently without blocking the poll loop.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_event()
//!     │    (bounded)         └──────► panic → warn!, continue
//!     ├──► [queue 2] ──► worker 2 ──► observer2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► observerN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may process event N while B processes N+5
//! - **Overflow**: event dropped for that observer only and counted; `warn` on the
//!   1st, 2nd, 4th, 8th, ... drop so a busy loop cannot flood the log
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Shutdown**: [`ObserverSet::shutdown`] closes every queue through a shared
//!   reference, so a poll loop still holding the set cannot keep workers alive;
//!   later `emit()` calls are ignored
//! - **Isolation**: slow/panicking observer doesn't affect others nor the poll loop
//! - **Per-observer FIFO**: each observer sees events in order
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::error::panic_message;
use crate::events::Event;
use crate::observers::Observe;

/// Per-observer channel metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
    dropped: AtomicU64,
}

/// Fan-out coordinator for event observers.
///
/// Manages per-observer queues and worker tasks, providing:
/// - **Concurrent delivery**: events sent to all observers simultaneously
/// - **Panic safety**: panics caught and logged, never reach the engine
/// - **Overflow handling**: dropped events are logged
pub struct ObserverSet {
    channels: RwLock<Vec<ObserverChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// Must be called from within a Tokio runtime. Minimum queue capacity is 1.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = obs.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                    {
                        warn!(
                            observer = obs.name(),
                            panic = %panic_message(&*panic_err),
                            "observer panicked; event skipped"
                        );
                    }
                }
            });
            channels.push(ObserverChannel {
                name,
                sender: tx,
                dropped: AtomicU64::new(0),
            });
            workers.push(handle);
        }
        Self {
            channels: RwLock::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// A set with no observers; `emit` is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            channels: RwLock::new(Vec::new()),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Returns `true` if no observer is registered (or the set was shut down).
    pub fn is_empty(&self) -> bool {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Total number of events dropped because an observer queue was full.
    pub fn dropped(&self) -> u64 {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|c| c.dropped.load(Ordering::Relaxed))
            .sum()
    }

    /// Emits an event to all observers.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: drops the event for that observer and counts it
    /// - After [`shutdown`](ObserverSet::shutdown): no-op
    pub fn emit(&self, event: Event) {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        if channels.is_empty() {
            return;
        }
        let event = Arc::new(event);
        for channel in channels.iter() {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    let dropped = channel.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    if dropped.is_power_of_two() {
                        warn!(observer = channel.name, dropped, "observer queue full; events dropped");
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(observer = channel.name, "observer worker stopped; event dropped");
                }
            }
        }
    }

    /// Flushes queued events and stops all observer workers.
    ///
    /// 1. Closes every queue (workers drain what is already queued, then exit)
    /// 2. Awaits all worker tasks
    ///
    /// Works through a shared reference: clones held elsewhere (a detached poll
    /// loop) only lose the ability to emit.
    pub async fn shutdown(&self) {
        let channels = std::mem::take(
            &mut *self.channels.write().unwrap_or_else(PoisonError::into_inner),
        );
        for channel in &channels {
            let dropped = channel.dropped.load(Ordering::Relaxed);
            if dropped > 0 {
                warn!(observer = channel.name, dropped, "observer missed events");
            }
        }
        drop(channels);

        let workers =
            std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        for h in workers {
            let _ = h.await;
        }
    }
}
