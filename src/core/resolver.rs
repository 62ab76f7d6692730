//! # Outcome resolution.
//!
//! Once the race settles, the engine hands the poll loop's state and the cancellation
//! flag to [`resolve`]. Precedence:
//!
//! ```text
//! 1. poll loop ended with an error   ──► Faulted(err)        (JoinError panic → Panicked)
//! 2. cancellation token is set       ──► Cancelled
//! 3. poll worker stopped by runtime  ──► Faulted(Interrupted)
//! 4. otherwise                       ──► Completed(report)
//! ```
//!
//! `Cancelled` is only produced when the token is set.
//!
//! A genuine fault is never masked by a cancellation requested at the same time.
//! No retries happen here.

use tokio::task::JoinError;

use crate::core::poll_loop::LoopExit;
use crate::error::{PollError, panic_message};
use crate::outcome::Outcome;

/// What the engine knows about the poll loop when the race settles.
#[derive(Debug)]
pub(crate) enum PollState {
    /// The poll loop task finished; its join result.
    Finished(Result<Result<LoopExit, PollError>, JoinError>),
    /// The watchdog won while the loop was still asleep or mid-evaluation.
    Running,
}

/// Resolves the final [`Outcome`] of one invocation.
pub(crate) fn resolve(poll: PollState, cancelled: bool) -> Outcome {
    let exit = match poll {
        PollState::Finished(Ok(Err(err))) => return Outcome::Faulted(err),
        PollState::Finished(Err(join)) => match join.try_into_panic() {
            Ok(payload) => {
                return Outcome::Faulted(PollError::Panicked {
                    message: panic_message(&*payload),
                });
            }
            Err(_) if cancelled => None,
            Err(_) => return Outcome::Faulted(PollError::Interrupted),
        },
        PollState::Finished(Ok(Ok(exit))) => Some(exit),
        PollState::Running => None,
    };

    if cancelled {
        return Outcome::Cancelled;
    }
    match exit {
        Some(LoopExit::Completed(report)) => Outcome::Completed(report),
        // The loop only exits as cancelled after seeing the token, and is only
        // detached when the watchdog saw it.
        Some(LoopExit::Cancelled { .. }) | None => Outcome::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::PollReport;
    use std::time::Duration;

    fn report() -> PollReport {
        PollReport {
            iterations: 4,
            elapsed: Duration::from_millis(300),
        }
    }

    #[test]
    fn test_fault_beats_cancellation() {
        let state = PollState::Finished(Ok(Err(PollError::Predicate {
            iteration: 2,
            source: "focuser not responding".into(),
        })));
        match resolve(state, true) {
            Outcome::Faulted(err) => assert_eq!(err.to_string(), "focuser not responding"),
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_beats_completion() {
        let state = PollState::Finished(Ok(Ok(LoopExit::Completed(report()))));
        assert!(resolve(state, true).is_cancelled());
    }

    #[test]
    fn test_completion_without_cancellation() {
        let state = PollState::Finished(Ok(Ok(LoopExit::Completed(report()))));
        match resolve(state, false) {
            Outcome::Completed(r) => assert_eq!(r, report()),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_detached_loop_with_cancellation() {
        assert!(resolve(PollState::Running, true).is_cancelled());
    }

    async fn aborted_join() -> Result<Result<LoopExit, PollError>, JoinError> {
        let handle = tokio::spawn(async {
            std::future::pending::<()>().await;
            Ok::<_, PollError>(LoopExit::Cancelled { iterations: 0 })
        });
        handle.abort();
        handle.await
    }

    #[tokio::test]
    async fn test_interrupted_worker_without_cancellation_is_a_fault() {
        let join = aborted_join().await;
        assert!(join.as_ref().unwrap_err().is_cancelled());
        match resolve(PollState::Finished(join), false) {
            Outcome::Faulted(PollError::Interrupted) => {}
            other => panic!("expected interrupted fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interrupted_worker_with_cancellation_is_cancelled() {
        let join = aborted_join().await;
        assert!(resolve(PollState::Finished(join), true).is_cancelled());
    }

    #[tokio::test]
    async fn test_panic_is_unwrapped_from_join_error() {
        let join = tokio::spawn(async {
            if true {
                panic!("initiator exploded");
            }
            Ok::<_, PollError>(LoopExit::Cancelled { iterations: 0 })
        })
        .await;

        match resolve(PollState::Finished(join), true) {
            Outcome::Faulted(PollError::Panicked { message }) => {
                assert_eq!(message, "initiator exploded")
            }
            other => panic!("expected panic fault, got {other:?}"),
        }
    }
}
