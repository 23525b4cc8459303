//! Condition polling engine.
//!
//! Keeps a [`ConditionsSnapshot`] continuously fresh by polling the oracle:
//! - fetch immediately on start, then every `poll_interval` after a success
//! - on any failure, keep the previous snapshot and retry after
//!   `retry_backoff` instead of waiting out the full interval
//! - never give up and never surface fetch errors to subscribers
//!
//! One `sleep` per loop iteration carries both schedules, so a retry always
//! supersedes the pending interval tick and at most one fetch is in flight.

mod snapshot;

pub use snapshot::{ConditionsSnapshot, FeedPhase};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    conditions::{ConditionsClient, ConditionsResponse},
    consts::{POLL_INTERVAL, RETRY_BACKOFF},
    prelude::*,
};

/// Scheduling knobs for the poll loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between successful fetches.
    pub poll_interval: Duration,
    /// Delay before retrying a failed fetch.
    pub retry_backoff: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval: POLL_INTERVAL,
            retry_backoff: RETRY_BACKOFF,
        }
    }
}

/// Trait for the condition feed.
/// Abstracts the oracle client to enable testing and mocking.
#[async_trait]
pub trait ConditionsSource: Send + Sync {
    async fn fetch_conditions(&self) -> Result<ConditionsResponse>;
}

#[async_trait]
impl ConditionsSource for ConditionsClient {
    async fn fetch_conditions(&self) -> Result<ConditionsResponse> {
        self.conditions().await
    }
}

/// Blanket implementation so shared sources can be handed to the monitor.
#[async_trait]
impl<S: ConditionsSource + ?Sized> ConditionsSource for Arc<S> {
    async fn fetch_conditions(&self) -> Result<ConditionsResponse> {
        (**self).fetch_conditions().await
    }
}

/// Background poller publishing the latest [`ConditionsSnapshot`].
///
/// Single-writer: only the spawned poll loop touches the snapshot.
/// Subscribers read through cheap watch receivers.
pub struct ConditionsMonitor<S: ConditionsSource + 'static> {
    source: Arc<S>,
    config: MonitorConfig,
    // Taken exactly once by `start`; emptiness doubles as the "running" flag.
    sender: Mutex<Option<watch::Sender<ConditionsSnapshot>>>,
    receiver: watch::Receiver<ConditionsSnapshot>,
    cancel: CancellationToken,
}

impl<S: ConditionsSource + 'static> ConditionsMonitor<S> {
    pub fn new(source: S, config: MonitorConfig) -> ConditionsMonitor<S> {
        let (tx, rx) = watch::channel(ConditionsSnapshot::default());
        ConditionsMonitor {
            source: Arc::new(source),
            config,
            sender: Mutex::new(Some(tx)),
            receiver: rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Begin polling. The first fetch is issued immediately.
    ///
    /// Idempotent: calling again while running has no additional effect.
    pub fn start(&self) {
        let Some(sender) = self.sender.lock().unwrap().take() else {
            debug!("conditions monitor already started");
            return;
        };
        let source = Arc::clone(&self.source);
        let cancel = self.cancel.clone();
        let config = self.config.clone();
        tokio::spawn(poll_loop(source, sender, cancel, config));
    }

    /// Cancel the pending timer and all future fetches.
    ///
    /// Safe to call repeatedly. A stopped monitor stays stopped.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Watch receiver that yields after every successful fetch.
    pub fn subscribe(&self) -> watch::Receiver<ConditionsSnapshot> {
        self.receiver.clone()
    }

    /// Current snapshot, by value.
    pub fn snapshot(&self) -> ConditionsSnapshot {
        self.receiver.borrow().clone()
    }
}

impl<S: ConditionsSource + 'static> Drop for ConditionsMonitor<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<S: ConditionsSource>(
    source: Arc<S>,
    sender: watch::Sender<ConditionsSnapshot>,
    cancel: CancellationToken,
    config: MonitorConfig,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let delay = match source.fetch_conditions().await {
            Ok(reading) => {
                let fetched_at = Utc::now();
                sender.send_modify(|snapshot| snapshot.absorb(&reading, fetched_at));
                debug!(
                    direction = reading.wind_direction,
                    speed = reading.wind_speed,
                    is_open = reading.is_open,
                    "conditions updated"
                );
                config.poll_interval
            }
            Err(err) => {
                // Previous snapshot stays authoritative; subscribers see
                // stale-but-last-known data rather than an error state.
                warn!(error = %err, "conditions fetch failed, retrying");
                config.retry_backoff
            }
        };
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    debug!("conditions poll loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that replays a scripted sequence of fetch outcomes.
    struct ScriptedSource {
        outcomes: Mutex<VecDeque<Result<ConditionsResponse>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(outcomes: Vec<Result<ConditionsResponse>>) -> Arc<ScriptedSource> {
            Arc::new(ScriptedSource {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConditionsSource for ScriptedSource {
        async fn fetch_conditions(&self) -> Result<ConditionsResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::GenericRequest("script exhausted".to_string())))
        }
    }

    fn reading(direction: f64, speed: f64, is_open: bool) -> Result<ConditionsResponse> {
        Ok(ConditionsResponse {
            wind_direction: direction,
            wind_speed: speed,
            is_open,
        })
    }

    fn network_error() -> Result<ConditionsResponse> {
        Err(Error::GenericRequest("connection refused".to_string()))
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate() {
        let source = ScriptedSource::new(vec![reading(90.0, 12.0, true)]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;

        assert_eq!(source.calls(), 1);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.phase, FeedPhase::Live);
        assert_eq!(snapshot.direction_degrees, 90.0);
        assert_eq!(snapshot.cardinal(), "E");
        assert_eq!(snapshot.speed, 12.0);
        assert!(snapshot.is_open);
        assert!(snapshot.updated_at.is_some());
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let source = ScriptedSource::new(vec![reading(0.0, 1.0, false)]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        monitor.start();
        settle().await;

        // A second loop would have fetched a second time immediately.
        assert_eq!(source.calls(), 1);
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_schedules_full_interval() {
        let source = ScriptedSource::new(vec![reading(10.0, 5.0, false), reading(20.0, 6.0, false)]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(1500)).await;
        settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(monitor.snapshot().direction_degrees, 20.0);
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_retries_on_short_backoff() {
        let source = ScriptedSource::new(vec![
            reading(10.0, 5.0, true),
            network_error(),
            reading(30.0, 7.0, true),
        ]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(source.calls(), 2);

        // The failed fetch reschedules after 1s, superseding the 10s tick.
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(source.calls(), 3);
        assert_eq!(monitor.snapshot().direction_degrees, 30.0);
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_warming_survives_failures_until_first_success() {
        let source = ScriptedSource::new(vec![
            network_error(),
            network_error(),
            network_error(),
            reading(45.0, 3.0, false),
            network_error(),
        ]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;
        assert!(monitor.snapshot().is_warming());

        for expected_calls in 2..=3 {
            tokio::time::advance(Duration::from_secs(1)).await;
            settle().await;
            assert_eq!(source.calls(), expected_calls);
            assert!(monitor.snapshot().is_warming());
        }

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(source.calls(), 4);
        assert_eq!(monitor.snapshot().phase, FeedPhase::Live);

        // A later failure never reverts the phase.
        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(source.calls(), 5);
        assert_eq!(monitor.snapshot().phase, FeedPhase::Live);
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_snapshot() {
        let source = ScriptedSource::new(vec![reading(90.0, 12.0, true), network_error()]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;
        let before = monitor.snapshot();

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(monitor.snapshot(), before);
        assert!(monitor.snapshot().is_open);
        monitor.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_fetches() {
        let source = ScriptedSource::new(vec![reading(10.0, 5.0, false)]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        monitor.start();
        settle().await;
        assert_eq!(source.calls(), 1);

        monitor.stop();
        monitor.stop();
        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let source = ScriptedSource::new(vec![reading(180.0, 2.0, false)]);
        let monitor = ConditionsMonitor::new(Arc::clone(&source), MonitorConfig::default());
        let mut updates = monitor.subscribe();
        monitor.start();

        updates.changed().await.unwrap();
        let snapshot = updates.borrow().clone();
        assert_eq!(snapshot.direction_degrees, 180.0);
        assert_eq!(snapshot.cardinal(), "S");
        monitor.stop();
    }
}
