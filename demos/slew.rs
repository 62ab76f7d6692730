//! # Example: slew
//!
//! Drives a simulated telescope mount through a slew with [`run_until_complete`].
//!
//! Shows how to:
//! - Wrap a synchronous device facade with [`OperationFn`]
//! - Attach a diagnostic probe that shows up in iteration traces
//! - Cancel the slew with Ctrl-C via [`cancel_on_shutdown`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► cancel_on_shutdown(token)           (Ctrl-C / SIGTERM → cancel)
//!   └─► run_until_complete(slew, &token)
//!         ├─► initiate: mount starts moving (background task steps RA/Dec)
//!         ├─► is_running() every 250ms      (probe prints current position)
//!         └─► mount reaches target ──► Outcome::Completed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=pollvisor=trace cargo run --example slew
//! ```

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pollvisor::{
    LogWriter, OperationFn, Outcome, PollRequest, cancel_on_shutdown, run_until_complete,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Simulated mount: `step` is how far along the slew is, in tenths.
struct Mount {
    slewing: AtomicBool,
    step: AtomicU32,
}

impl Mount {
    fn start_slew(self: &Arc<Self>) {
        self.step.store(0, Ordering::SeqCst);
        self.slewing.store(true, Ordering::SeqCst);

        let mount = Arc::clone(self);
        tokio::spawn(async move {
            while mount.step.fetch_add(1, Ordering::SeqCst) < 10 {
                tokio::time::sleep(Duration::from_millis(180)).await;
            }
            mount.slewing.store(false, Ordering::SeqCst);
        });
    }

    fn position(&self) -> String {
        let step = self.step.load(Ordering::SeqCst).min(10);
        let ra = 2.0 + 0.8 * f64::from(step);
        let dec = -5.0 + 4.6 * f64::from(step);
        format!("ra={ra:.1}h dec={dec:+.1}°")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pollvisor=debug")),
        )
        .init();

    let mount = Arc::new(Mount {
        slewing: AtomicBool::new(false),
        step: AtomicU32::new(0),
    });

    let (start, poll, probe) = (mount.clone(), mount.clone(), mount.clone());
    let slew = OperationFn::new(
        "slew",
        move || {
            start.start_slew();
            Ok(())
        },
        move || Ok(poll.slewing.load(Ordering::SeqCst)),
    )
    .with_probe(move || Ok(probe.position()));

    let token = CancellationToken::new();
    let signals = cancel_on_shutdown(token.clone());

    let outcome = run_until_complete(
        PollRequest::from_millis(slew, 250),
        &token,
        Some(Arc::new(LogWriter::new())),
    )
    .await;

    match &outcome {
        Outcome::Completed(report) => println!(
            "slew finished at {} after {} polls in {:?}",
            mount.position(),
            report.iterations,
            report.elapsed
        ),
        Outcome::Cancelled => println!("slew cancelled at {}", mount.position()),
        Outcome::Faulted(err) => println!("slew failed: {err}"),
    }

    token.cancel();
    signals.await?;
    outcome.into_result()?;
    Ok(())
}
