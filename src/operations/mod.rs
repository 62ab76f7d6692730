//! # Operation abstractions and requests.
//!
//! This module provides the operation-related types:
//! - [`Operation`] - trait for a pollable long-running device operation
//! - [`OperationFn`] - closure-backed implementation for synchronous facades
//! - [`PollRequest`] - an operation bundled with its target interval

mod operation;
mod operation_fn;
mod request;

pub use operation::Operation;
pub use operation_fn::OperationFn;
pub use request::PollRequest;
