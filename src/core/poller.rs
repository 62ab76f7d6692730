//! # Poller: shared configuration and observers for many polled operations.
//!
//! A device driver typically exposes a couple of dozen capabilities (connect, expose,
//! slew, move filter wheel, open cover, ...). Each one is an [`Operation`](crate::Operation);
//! the [`Poller`] runs all of them with one [`PollConfig`] and one [`ObserverSet`].
//!
//! ## High-level architecture
//! ```text
//!   capability call ──► PollRequest ──► Poller::run(request, &token)
//!                                           │
//!                                           ├─► engine::drive(...)
//!                                           │      ├─► poll_loop ──► emit(Event) ──┐
//!                                           │      └─► watchdog                    │
//!                                           ▼                                      ▼
//!                                        Outcome                        ObserverSet ──► observers
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use pollvisor::{LogWriter, Observe, OperationFn, PollConfig, Poller};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(LogWriter::new())];
//! let poller = Poller::new(PollConfig::default(), observers);
//!
//! let token = CancellationToken::new();
//! let park = OperationFn::new("park", || Ok(()), || Ok(false));
//! let outcome = poller.run(poller.request(park), &token).await;
//! assert!(outcome.is_completed());
//!
//! poller.shutdown().await;
//! # }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::core::engine::{drive, flush};
use crate::observers::{Observe, ObserverSet};
use crate::operations::{Operation, PollRequest};
use crate::outcome::Outcome;

/// Runs polled operations with a shared configuration and observer fan-out.
pub struct Poller {
    cfg: PollConfig,
    observers: Arc<ObserverSet>,
}

impl Poller {
    /// Creates a poller with the given config and observers.
    ///
    /// Must be called from within a Tokio runtime (observer workers are spawned here).
    pub fn new(cfg: PollConfig, observers: Vec<Arc<dyn Observe>>) -> Self {
        Self {
            cfg,
            observers: Arc::new(ObserverSet::new(observers)),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PollConfig {
        &self.cfg
    }

    /// Builds a request for `operation` using the configured default interval.
    pub fn request(&self, operation: impl Operation) -> PollRequest {
        PollRequest::with_defaults(operation, &self.cfg)
    }

    /// Drives one request to its outcome.
    ///
    /// Calls may run concurrently; each has its own timing state and its own pair of
    /// workers.
    pub async fn run(&self, request: PollRequest, cancel: &CancellationToken) -> Outcome {
        drive(request, cancel, &self.cfg, Arc::clone(&self.observers)).await
    }

    /// Flushes pending events to observers and stops their workers.
    ///
    /// Operations left running in the background after a cancellation do not delay
    /// this; their later events are discarded.
    pub async fn shutdown(self) {
        flush(&self.observers).await;
    }
}
