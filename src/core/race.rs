//! # Finish slot: "first of two" race between the poll loop and the watchdog.
//!
//! Both workers hold a [`FinishSlot`] and report their [`Lane`] when they exit. The slot
//! is a single-capacity channel; the first `try_send` fills it and every later one is
//! ignored, so the receiver observes exactly one winner.
//!
//! ```text
//!  poll loop ──(guard drop)──┐
//!                            ├──► [slot: 1] ──► engine awaits first lane
//!  watchdog  ──(exit)────────┘
//! ```
//!
//! The poll loop reports through a [`FinishGuard`] so the race settles even when an
//! operation callback panics and the task unwinds.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Which worker finished first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    PollLoop,
    Watchdog,
}

/// Sending half of the race; cheap to clone.
#[derive(Clone, Debug)]
pub struct FinishSlot {
    tx: mpsc::Sender<Lane>,
}

/// Receiving half of the race.
#[derive(Debug)]
pub struct FinishLine {
    rx: mpsc::Receiver<Lane>,
}

/// Creates a connected slot/line pair.
pub fn finish_slot() -> (FinishSlot, FinishLine) {
    let (tx, rx) = mpsc::channel(1);
    (FinishSlot { tx }, FinishLine { rx })
}

impl FinishSlot {
    /// Reports `lane` as finished. Returns `true` if this call won the race.
    pub fn finish(&self, lane: Lane) -> bool {
        self.tx.try_send(lane).is_ok()
    }
}

impl FinishLine {
    /// Waits for the first finisher.
    ///
    /// Returns `None` only if every slot was dropped without reporting, which the
    /// engine never does: the poll loop always reports through its guard.
    pub async fn first(mut self) -> Option<Lane> {
        self.rx.recv().await
    }
}

/// Reports [`Lane::PollLoop`] and marks the loop finished when dropped.
///
/// `done` is the lifecycle token the watchdog watches.
pub struct FinishGuard {
    slot: FinishSlot,
    done: CancellationToken,
}

impl FinishGuard {
    pub fn new(slot: FinishSlot, done: CancellationToken) -> Self {
        Self { slot, done }
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.done.cancel();
        self.slot.finish(Lane::PollLoop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_writer_wins() {
        let (slot, line) = finish_slot();
        assert!(slot.finish(Lane::Watchdog));
        assert!(!slot.clone().finish(Lane::PollLoop));
        assert_eq!(line.first().await, Some(Lane::Watchdog));
    }

    #[tokio::test]
    async fn test_guard_reports_on_drop() {
        let (slot, line) = finish_slot();
        let done = CancellationToken::new();
        drop(FinishGuard::new(slot, done.clone()));
        assert!(done.is_cancelled());
        assert_eq!(line.first().await, Some(Lane::PollLoop));
    }

    #[tokio::test]
    async fn test_guard_reports_when_task_panics() {
        let (slot, line) = finish_slot();
        let done = CancellationToken::new();
        let guard = FinishGuard::new(slot, done.clone());
        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("predicate exploded");
        });
        assert!(handle.await.unwrap_err().is_panic());
        assert!(done.is_cancelled());
        assert_eq!(line.first().await, Some(Lane::PollLoop));
    }
}
