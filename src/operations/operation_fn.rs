//! # Closure-backed operation (`OperationFn`)
//!
//! [`OperationFn`] adapts a synchronous device facade: an initiator `FnOnce`, a predicate
//! `FnMut` and an optional probe. Using `FnOnce` for the initiator means the operation
//! cannot be started twice.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use pollvisor::{Operation, OperationFn};
//!
//! let slewing = Arc::new(AtomicBool::new(false));
//! let (start, poll) = (slewing.clone(), slewing.clone());
//!
//! let op = OperationFn::new(
//!     "slew",
//!     move || { start.store(true, Ordering::SeqCst); Ok(()) },
//!     move || Ok(poll.load(Ordering::SeqCst)),
//! )
//! .with_probe(|| Ok("ra=10.2h dec=+41.3".to_string()));
//!
//! assert_eq!(op.name(), "slew");
//! ```
//!
//! Every closure call runs on Tokio's blocking pool (`spawn_blocking`), so a facade
//! doing slow synchronous I/O never stalls the watchdog, even on a current-thread
//! runtime. A panic inside a closure is re-raised in the poll loop. A probe that
//! panicked is gone for the rest of the operation.

use std::borrow::Cow;

use async_trait::async_trait;
use tokio::task;

use crate::error::DeviceError;
use crate::operations::operation::Operation;

type ProbeFn = Box<dyn FnMut() -> Result<String, DeviceError> + Send>;

/// Function-backed operation implementation.
pub struct OperationFn<I, P> {
    name: Cow<'static, str>,
    initiator: Option<I>,
    predicate: Option<P>,
    probe: Option<ProbeFn>,
}

impl<I, P> OperationFn<I, P>
where
    I: FnOnce() -> Result<(), DeviceError> + Send + 'static,
    P: FnMut() -> Result<bool, DeviceError> + Send + 'static,
{
    /// Creates a new closure-backed operation.
    ///
    /// ### Parameters
    /// - `initiator`: starts the device operation
    /// - `predicate`: returns `true` while the operation is still running
    pub fn new(name: impl Into<Cow<'static, str>>, initiator: I, predicate: P) -> Self {
        Self {
            name: name.into(),
            initiator: Some(initiator),
            predicate: Some(predicate),
            probe: None,
        }
    }

    /// Attaches a diagnostic probe used for iteration traces.
    pub fn with_probe<D>(mut self, probe: D) -> Self
    where
        D: FnMut() -> Result<String, DeviceError> + Send + 'static,
    {
        self.probe = Some(Box::new(probe));
        self
    }
}

#[async_trait]
impl<I, P> Operation for OperationFn<I, P>
where
    I: FnOnce() -> Result<(), DeviceError> + Send + 'static,
    P: FnMut() -> Result<bool, DeviceError> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn initiate(&mut self) -> Result<(), DeviceError> {
        match self.initiator.take() {
            Some(start) => blocking(start).await?,
            None => Err(format!("operation {:?} was already initiated", self.name).into()),
        }
    }

    async fn is_running(&mut self) -> Result<bool, DeviceError> {
        let Some(mut predicate) = self.predicate.take() else {
            return Err(format!("predicate of {:?} was lost to an earlier panic", self.name).into());
        };
        let (predicate, running) = blocking(move || {
            let running = predicate();
            (predicate, running)
        })
        .await?;
        self.predicate = Some(predicate);
        running
    }

    async fn describe(&mut self) -> Result<Option<String>, DeviceError> {
        let Some(mut probe) = self.probe.take() else {
            return Ok(None);
        };
        let (probe, detail) = blocking(move || {
            let detail = probe();
            (probe, detail)
        })
        .await?;
        self.probe = Some(probe);
        detail.map(Some)
    }
}

/// Runs `f` on the blocking pool and resumes its panic, if any, on the caller.
async fn blocking<F, T>(f: F) -> Result<T, DeviceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match task::spawn_blocking(f).await {
        Ok(out) => Ok(out),
        Err(err) => match err.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            // Runtime shutting down before the call ran.
            Err(err) => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initiator_runs_once() {
        let mut op = OperationFn::new("connect", || Ok(()), || Ok(false));
        assert!(op.initiate().await.is_ok());

        let second = op.initiate().await.unwrap_err();
        assert!(second.to_string().contains("already initiated"));
    }

    #[tokio::test]
    async fn test_probe_is_optional() {
        let mut bare = OperationFn::new("expose", || Ok(()), || Ok(true));
        assert_eq!(bare.describe().await.unwrap(), None);

        let mut probed = bare.with_probe(|| Ok("exposing".into()));
        assert_eq!(probed.describe().await.unwrap().as_deref(), Some("exposing"));
    }

    #[tokio::test]
    async fn test_predicate_state_survives_between_calls() {
        let mut left = 2u32;
        let mut op = OperationFn::new("close-shutter", || Ok(()), move || {
            left -= 1;
            Ok(left > 0)
        });
        op.initiate().await.unwrap();
        assert!(op.is_running().await.unwrap());
        assert!(!op.is_running().await.unwrap());
    }

    #[tokio::test]
    async fn test_slow_predicate_does_not_stall_the_runtime() {
        let mut op = OperationFn::new("slew", || Ok(()), || {
            std::thread::sleep(std::time::Duration::from_millis(300));
            Ok(true)
        });
        let ticker = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            std::time::Instant::now()
        });

        let started = std::time::Instant::now();
        assert!(op.is_running().await.unwrap());
        let ticked_at = ticker.await.unwrap();
        assert!(ticked_at.duration_since(started) < std::time::Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_panicking_probe_is_dropped() {
        use futures::FutureExt;
        use std::panic::AssertUnwindSafe;

        let mut op = OperationFn::new("rotate", || Ok(()), || Ok(true))
            .with_probe(|| -> Result<String, DeviceError> { panic!("probe bug") });
        let first = AssertUnwindSafe(op.describe()).catch_unwind().await;
        assert!(first.is_err());
        assert_eq!(op.describe().await.unwrap(), None);
    }
}
