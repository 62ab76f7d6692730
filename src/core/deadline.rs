//! # Deadline-driven cancellation.
//!
//! The engine imposes no timeout of its own. A caller that wants one derives a child
//! token that is cancelled when the deadline passes; the operation then resolves to
//! [`Outcome::Cancelled`](crate::Outcome::Cancelled), exactly as if a user had
//! cancelled it.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Returns a child of `parent` that is cancelled after `timeout`.
///
/// Cancelling `parent` cancels the child too. The timer task ends as soon as the child
/// is cancelled by either path. Must be called from within a Tokio runtime.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use pollvisor::{OperationFn, PollRequest, cancel_after, run_until_complete};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let root = CancellationToken::new();
/// let token = cancel_after(&root, Duration::from_millis(50));
///
/// let stuck = OperationFn::new("find-home", || Ok(()), || Ok(true));
/// let outcome = run_until_complete(PollRequest::from_millis(stuck, 10), &token, None).await;
/// assert!(outcome.is_cancelled());
/// assert!(!root.is_cancelled());
/// # }
/// ```
pub fn cancel_after(parent: &CancellationToken, timeout: Duration) -> CancellationToken {
    let child = parent.child_token();
    let token = child.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = time::sleep(timeout) => {
                debug!(?timeout, "deadline reached; cancelling operation");
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    });
    child
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_child_cancelled_after_timeout() {
        let root = CancellationToken::new();
        let token = cancel_after(&root, Duration::from_millis(200));

        time::sleep(Duration::from_millis(150)).await;
        assert!(!token.is_cancelled());
        time::sleep(Duration::from_millis(100)).await;
        assert!(token.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancellation_propagates() {
        let root = CancellationToken::new();
        let token = cancel_after(&root, Duration::from_secs(60));
        root.cancel();
        assert!(token.is_cancelled());
    }
}
