//! # Example: filter_wheel
//!
//! Runs several capabilities of one simulated device through a shared [`Poller`].
//!
//! Shows how to:
//! - Implement [`Operation`] directly for a device with async I/O
//! - Write a custom [`Observe`] implementation that prints a progress line
//! - Share one [`PollConfig`] and one set of observers across operations
//! - Run two operations concurrently without sharing timing state
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Poller::new(cfg, [Progress])
//!   ├─► connect          (completes on first evaluation)
//!   ├─► join!(
//!   │     move wheel to slot 4   @ 150ms,
//!   │     open dust cover        @ 400ms)
//!   ├─► move wheel to slot 9     (slot does not exist → predicate fault)
//!   └─► Poller::shutdown()       (flush events)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example filter_wheel
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pollvisor::{
    DeviceError, Event, EventKind, Observe, Operation, OperationFn, PollConfig, PollRequest,
    Poller,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

const SLOTS: u32 = 6;

/// Filter wheel reached over a (simulated) serial link.
struct Wheel {
    position: Arc<Mutex<u32>>,
    target: u32,
}

#[async_trait]
impl Operation for Wheel {
    fn name(&self) -> &str {
        "move-filter-wheel"
    }

    async fn initiate(&mut self) -> Result<(), DeviceError> {
        // Command write; the wheel accepts any slot number and only complains later.
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    }

    async fn is_running(&mut self) -> Result<bool, DeviceError> {
        tokio::time::sleep(Duration::from_millis(15)).await;
        let mut pos = self.position.lock().await;
        if self.target >= SLOTS {
            return Err(format!("slot {} out of range 0..{SLOTS}", self.target).into());
        }
        if *pos != self.target {
            *pos = (*pos + 1) % SLOTS;
        }
        Ok(*pos != self.target)
    }

    async fn describe(&mut self) -> Result<Option<String>, DeviceError> {
        Ok(Some(format!("slot={}", *self.position.lock().await)))
    }
}

/// Prints a compact progress line per event.
struct Progress;

#[async_trait]
impl Observe for Progress {
    async fn on_event(&self, e: &Event) {
        let op = e.operation.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::OperationStarting => println!("[{op}] started"),
            EventKind::PollIteration => println!(
                "[{op}] #{} {} next in {}ms",
                e.iteration.unwrap_or_default(),
                e.detail.as_deref().unwrap_or(""),
                e.delay_ms.unwrap_or_default()
            ),
            EventKind::OutcomeResolved => println!(
                "[{op}] {} {}",
                e.reason.as_deref().unwrap_or(""),
                e.detail.as_deref().unwrap_or("")
            ),
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "progress"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = PollConfig {
        interval: Duration::from_millis(150),
        watchdog_cadence: Duration::from_millis(50),
        ..PollConfig::default()
    };
    let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(Progress)];
    let poller = Poller::new(cfg, observers);
    let token = CancellationToken::new();

    let connect = OperationFn::new("connect", || Ok(()), || Ok(false));
    poller.run(poller.request(connect), &token).await.into_result()?;

    let position = Arc::new(Mutex::new(0));
    let wheel = Wheel {
        position: position.clone(),
        target: 4,
    };

    let cover_open = Arc::new(AtomicBool::new(false));
    let flag = cover_open.clone();
    let cover = OperationFn::new(
        "open-cover",
        move || {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(900)).await;
                flag.store(true, Ordering::SeqCst);
            });
            Ok(())
        },
        move || Ok(!cover_open.load(Ordering::SeqCst)),
    );

    let (wheel, cover) = tokio::join!(
        poller.run(poller.request(wheel), &token),
        poller.run(PollRequest::from_millis(cover, 400), &token),
    );
    let wheel = wheel.into_result()?;
    let cover = cover.into_result()?;
    println!(
        "wheel: {} polls in {:?}; cover: {} polls in {:?}",
        wheel.iterations, wheel.elapsed, cover.iterations, cover.elapsed
    );

    let bad = Wheel { position, target: 9 };
    let outcome = poller.run(poller.request(bad), &token).await;
    println!("bad move resolved as {}", outcome.as_label());

    poller.shutdown().await;
    Ok(())
}
