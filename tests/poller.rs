//! `Poller` with shared config/observers, concurrent invocations and deadlines.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pollvisor::{
    DeviceError, Event, EventKind, LogWriter, Observe, Operation, OperationFn, PollConfig,
    PollRequest, Poller, cancel_after,
};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl Observe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

struct Faulty;

#[async_trait]
impl Observe for Faulty {
    async fn on_event(&self, _event: &Event) {
        panic!("observer bug");
    }

    fn name(&self) -> &'static str {
        "faulty"
    }
}

/// Filter wheel driven over an async transport: reports its slot until it arrives.
struct FilterWheel {
    target: u32,
    position: u32,
    moves: Arc<AtomicU32>,
}

#[async_trait]
impl Operation for FilterWheel {
    fn name(&self) -> &str {
        "filter-wheel"
    }

    async fn initiate(&mut self) -> Result<(), DeviceError> {
        self.moves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn is_running(&mut self) -> Result<bool, DeviceError> {
        time::sleep(Duration::from_millis(5)).await;
        if self.position < self.target {
            self.position += 1;
        }
        Ok(self.position != self.target)
    }

    async fn describe(&mut self) -> Result<Option<String>, DeviceError> {
        Ok(Some(format!("slot {}/{}", self.position, self.target)))
    }
}

fn countdown(name: &'static str, running_evaluations: u32) -> impl Operation {
    let left = Arc::new(AtomicU32::new(running_evaluations));
    OperationFn::new(name, || Ok(()), move || {
        Ok(left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok())
    })
}

#[tokio::test(start_paused = true)]
async fn concurrent_invocations_keep_their_own_timing() {
    let poller = Poller::new(PollConfig::default(), Vec::new());
    let token = CancellationToken::new();

    let fast = PollRequest::from_millis(countdown("fast", 4), 50);
    let slow = PollRequest::from_millis(countdown("slow", 2), 200);
    let (fast, slow) = tokio::join!(poller.run(fast, &token), poller.run(slow, &token));

    let fast = fast.into_result().unwrap();
    let slow = slow.into_result().unwrap();
    assert_eq!(fast.iterations, 5);
    assert_eq!(slow.iterations, 3);
    assert!(fast.elapsed >= Duration::from_millis(195), "{:?}", fast.elapsed);
    assert!(fast.elapsed < Duration::from_millis(260), "{:?}", fast.elapsed);
    assert!(slow.elapsed >= Duration::from_millis(395), "{:?}", slow.elapsed);
    assert!(slow.elapsed < Duration::from_millis(460), "{:?}", slow.elapsed);

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn observers_are_shared_and_flushed_on_shutdown() {
    let recorder = Arc::new(Recorder::default());
    let observers: Vec<Arc<dyn Observe>> =
        vec![recorder.clone(), Arc::new(Faulty), Arc::new(LogWriter::new())];
    let poller = Poller::new(PollConfig::default(), observers);
    let token = CancellationToken::new();

    assert!(poller.run(poller.request(countdown("park", 1)), &token).await.is_completed());
    assert!(poller.run(poller.request(countdown("unpark", 0)), &token).await.is_completed());
    poller.shutdown().await;

    let events = recorder.events.lock().unwrap();
    let resolved: Vec<_> = events
        .iter()
        .filter(|e| e.kind == EventKind::OutcomeResolved)
        .map(|e| (e.operation.as_deref().unwrap().to_string(), e.iteration))
        .collect();
    assert_eq!(
        resolved,
        vec![("park".to_string(), Some(2)), ("unpark".to_string(), Some(1))]
    );
    assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[tokio::test(start_paused = true)]
async fn async_operation_reports_probe_and_completes() {
    let recorder = Arc::new(Recorder::default());
    let observers: Vec<Arc<dyn Observe>> = vec![recorder.clone()];
    let cfg = PollConfig {
        interval: Duration::from_millis(20),
        ..PollConfig::default()
    };
    let poller = Poller::new(cfg, observers);
    let moves = Arc::new(AtomicU32::new(0));
    let wheel = FilterWheel {
        target: 3,
        position: 0,
        moves: moves.clone(),
    };

    let token = CancellationToken::new();
    let report = poller
        .run(poller.request(wheel), &token)
        .await
        .into_result()
        .unwrap();
    poller.shutdown().await;

    assert_eq!(report.iterations, 3);
    assert_eq!(moves.load(Ordering::SeqCst), 1);
    let details: Vec<_> = recorder
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.is_iteration())
        .map(|e| e.detail.as_deref().unwrap_or_default().to_string())
        .collect();
    assert_eq!(details, vec!["slot 1/3", "slot 2/3"]);
}

#[tokio::test(start_paused = true)]
async fn tracing_disabled_emits_no_iterations() {
    let recorder = Arc::new(Recorder::default());
    let observers: Vec<Arc<dyn Observe>> = vec![recorder.clone()];
    let cfg = PollConfig {
        trace_iterations: false,
        ..PollConfig::default()
    };
    let poller = Poller::new(cfg, observers);
    let token = CancellationToken::new();

    let probes = Arc::new(AtomicU32::new(0));
    let p = probes.clone();
    let op = OperationFn::new("calibrate", || Ok(()), {
        let left = Arc::new(AtomicU32::new(3));
        move || Ok(left.fetch_sub(1, Ordering::SeqCst) > 1)
    })
    .with_probe(move || {
        p.fetch_add(1, Ordering::SeqCst);
        Ok("lamp on".into())
    });

    assert!(poller.run(PollRequest::from_millis(op, 10), &token).await.is_completed());
    poller.shutdown().await;

    assert_eq!(probes.load(Ordering::SeqCst), 0);
    assert!(!recorder.events.lock().unwrap().iter().any(Event::is_iteration));
}

#[tokio::test(start_paused = true)]
async fn deadline_cancels_stuck_operation() {
    let poller = Poller::new(PollConfig::default(), Vec::new());
    let root = CancellationToken::new();
    let token = cancel_after(&root, Duration::from_millis(500));

    let started = Instant::now();
    let stuck = OperationFn::new("find-home", || Ok(()), || Ok(true));
    let outcome = poller.run(PollRequest::new(stuck, Duration::from_secs(30)), &token).await;

    assert!(outcome.is_cancelled(), "{outcome:?}");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(500), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(600), "{elapsed:?}");
    assert!(!root.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn short_watchdog_cadence_unblocks_sooner() {
    let cfg = PollConfig {
        watchdog_cadence: Duration::from_millis(10),
        ..PollConfig::default()
    };
    let poller = Poller::new(cfg, Vec::new());
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(105)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let stuck = OperationFn::new("wait-for-dome", || Ok(()), || Ok(true));
    let outcome = poller.run(PollRequest::new(stuck, Duration::from_secs(5)), &token).await;

    assert!(outcome.is_cancelled());
    let elapsed = started.elapsed();
    assert!(elapsed <= Duration::from_millis(125), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn shutdown_flushes_outcome_of_detached_operation() {
    let recorder = Arc::new(Recorder::default());
    let observers: Vec<Arc<dyn Observe>> = vec![recorder.clone()];
    let poller = Poller::new(PollConfig::default(), observers);

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(150)).await;
        trigger.cancel();
    });

    // Sleeps 30s after the first evaluation, so the watchdog wins and the loop is
    // left running.
    let stuck = OperationFn::new("wait-for-dome", || Ok(()), || Ok(true));
    let outcome = poller.run(PollRequest::new(stuck, Duration::from_secs(30)), &token).await;
    assert!(outcome.is_cancelled());

    poller.shutdown().await;

    let kinds: Vec<EventKind> = recorder.events.lock().unwrap().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::OperationStarting,
            EventKind::PollIteration,
            EventKind::OutcomeResolved
        ]
    );
}
