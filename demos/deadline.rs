//! # Example: deadline
//!
//! Bounds a wait that never completes on its own with [`cancel_after`].
//!
//! Shows how to:
//! - Derive a deadline token from a parent token
//! - Observe that the engine resolves `Cancelled` within one watchdog cadence,
//!   even while the poll loop sits in a long sleep
//! - Tell a timeout apart from a parent cancellation
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► root = CancellationToken::new()
//!   ├─► deadline = cancel_after(&root, 1.5s)
//!   └─► run_until_complete(find-home @ 5s, &deadline)
//!         ├─► is_running() = true, sleep ~5s
//!         ├─► 1.5s: deadline cancelled
//!         └─► watchdog notices ──► Outcome::Cancelled (loop detached)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=pollvisor=debug cargo run --example deadline
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use pollvisor::{LogWriter, OperationFn, PollRequest, cancel_after, run_until_complete};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pollvisor=debug")),
        )
        .init();

    let root = CancellationToken::new();
    let deadline = cancel_after(&root, Duration::from_millis(1_500));

    // A focuser that lost its home sensor: it never stops searching.
    let find_home = OperationFn::new("find-home", || Ok(()), || Ok(true))
        .with_probe(|| Ok("home sensor: open".to_string()));

    let started = Instant::now();
    let outcome = run_until_complete(
        PollRequest::new(find_home, Duration::from_secs(5)),
        &deadline,
        Some(Arc::new(LogWriter::new())),
    )
    .await;

    if outcome.is_cancelled() && !root.is_cancelled() {
        println!("find-home timed out after {:?}", started.elapsed());
    } else {
        println!("find-home resolved as {}", outcome.as_label());
    }
    Ok(())
}
