//! # Device operation abstraction.
//!
//! An [`Operation`] is the (initiator, completion predicate, diagnostic probe) triple
//! that every device capability supplies: connect, expose, slew, move a filter wheel,
//! open a cover, ... The engine drives it; the operation only knows its device.
//!
//! The methods are async so that networked facades can await I/O. Synchronous
//! facades are easiest to adapt through [`OperationFn`](crate::OperationFn).

use async_trait::async_trait;

use crate::error::DeviceError;

/// # Long-running device operation driven by the poll engine.
///
/// The engine calls [`initiate`](Operation::initiate) exactly once, then
/// [`is_running`](Operation::is_running) until it returns `false` or the caller cancels.
/// Calls are strictly sequential; an operation is never polled concurrently with itself.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use pollvisor::{DeviceError, Operation};
///
/// struct OpenCover { remaining: u32 }
///
/// #[async_trait]
/// impl Operation for OpenCover {
///     fn name(&self) -> &str { "open-cover" }
///
///     async fn initiate(&mut self) -> Result<(), DeviceError> {
///         self.remaining = 3;
///         Ok(())
///     }
///
///     async fn is_running(&mut self) -> Result<bool, DeviceError> {
///         self.remaining = self.remaining.saturating_sub(1);
///         Ok(self.remaining > 0)
///     }
/// }
/// ```
#[async_trait]
pub trait Operation: Send + 'static {
    /// Returns a stable, human-readable operation name.
    fn name(&self) -> &str;

    /// Starts the device operation. Called exactly once, before any predicate evaluation.
    async fn initiate(&mut self) -> Result<(), DeviceError>;

    /// Completion predicate: `true` while the device operation is still in progress.
    async fn is_running(&mut self) -> Result<bool, DeviceError>;

    /// Diagnostic probe: a short description of the device state for traces.
    ///
    /// Errors are discarded by the engine.
    async fn describe(&mut self) -> Result<Option<String>, DeviceError> {
        Ok(None)
    }
}
