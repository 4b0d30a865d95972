//! Broadcast emitter: polls the producer on a fixed period and fans results out.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use trafficwatch_core::error::AppError;

use super::producer::NotificationProducer;
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;

/// Lifecycle state of the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterState {
    /// Scheduled, waiting for the next tick.
    Idle,
    /// A detection cycle is in progress.
    Running,
    /// No ticks are scheduled.
    Stopped,
}

/// Outcome of a single detection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// Sequence number of the cycle.
    pub tick: u64,
    /// Whether the producer yielded a notification.
    pub produced: bool,
    /// Delivery attempts (one per registered connection).
    pub attempted: usize,
    /// Successful deliveries.
    pub delivered: usize,
    /// Failed deliveries.
    pub failed: usize,
    /// Producer error that abandoned the cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Emitter status for health and admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitterStatus {
    /// Whether ticks are scheduled.
    pub running: bool,
    /// Current lifecycle state.
    pub state: EmitterState,
    /// Tick period in seconds.
    pub interval_seconds: u64,
    /// Cycles executed since creation.
    pub ticks: u64,
    /// Deliveries made by the most recent broadcast.
    pub last_delivery_count: usize,
}

/// Everything a detection cycle needs, shared with the ticker task.
struct Cycle {
    registry: Arc<ConnectionRegistry>,
    producer: Arc<dyn NotificationProducer>,
    metrics: Arc<RealtimeMetrics>,
    /// Serializes cycles so a manual trigger never overlaps a scheduled tick.
    gate: Mutex<()>,
    in_progress: AtomicBool,
    ticks: AtomicU64,
    last_delivery_count: AtomicUsize,
}

/// Handle to the running ticker task.
struct Ticker {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Periodically asks the producer for a notification and delivers it to
/// every registered connection.
pub struct BroadcastEmitter {
    cycle: Arc<Cycle>,
    period: Duration,
    ticker: Mutex<Option<Ticker>>,
}

impl std::fmt::Debug for BroadcastEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastEmitter")
            .field("producer", &self.cycle.producer.name())
            .field("period", &self.period)
            .finish()
    }
}

impl BroadcastEmitter {
    /// Creates a stopped emitter.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        producer: Arc<dyn NotificationProducer>,
        metrics: Arc<RealtimeMetrics>,
        period: Duration,
    ) -> Self {
        Self {
            cycle: Arc::new(Cycle {
                registry,
                producer,
                metrics,
                gate: Mutex::new(()),
                in_progress: AtomicBool::new(false),
                ticks: AtomicU64::new(0),
                last_delivery_count: AtomicUsize::new(0),
            }),
            period,
            ticker: Mutex::new(None),
        }
    }

    /// Schedules ticks every period, the first one period from now.
    ///
    /// Returns `false` if the emitter was already running.
    pub async fn start(&self) -> bool {
        let mut ticker = self.ticker.lock().await;
        if ticker.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_ticker(
            self.cycle.clone(),
            self.period,
            cancel.clone(),
        ));
        *ticker = Some(Ticker { cancel, task });

        info!(
            producer = self.cycle.producer.name(),
            interval_ms = self.period.as_millis() as u64,
            "Detection service started"
        );
        true
    }

    /// Cancels future ticks and waits for an in-flight cycle to finish.
    ///
    /// Once this returns no further cycle will run until [`BroadcastEmitter::start`].
    /// The emitter reports `Stopped` as soon as the ticker is detached, even
    /// while the last cycle drains. Returns `false` if it was already stopped.
    pub async fn stop(&self) -> bool {
        let Some(Ticker { cancel, task }) = self.ticker.lock().await.take() else {
            return false;
        };

        cancel.cancel();
        if let Err(e) = task.await {
            error!(error = %e, "Detection ticker ended abnormally");
        }

        info!("Detection service stopped");
        true
    }

    /// Runs one detection cycle immediately, outside the schedule.
    pub async fn trigger(&self) -> TickReport {
        self.cycle.run().await
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> EmitterState {
        if self.ticker.lock().await.is_none() {
            EmitterState::Stopped
        } else if self.cycle.in_progress.load(Ordering::SeqCst) {
            EmitterState::Running
        } else {
            EmitterState::Idle
        }
    }

    /// Whether ticks are scheduled.
    pub async fn is_running(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    /// Status summary.
    pub async fn status(&self) -> EmitterStatus {
        let state = self.state().await;
        EmitterStatus {
            running: state != EmitterState::Stopped,
            state,
            interval_seconds: self.period.as_secs(),
            ticks: self.cycle.ticks.load(Ordering::Relaxed),
            last_delivery_count: self.cycle.last_delivery_count.load(Ordering::Relaxed),
        }
    }
}

async fn run_ticker(cycle: Arc<Cycle>, period: Duration, cancel: CancellationToken) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        // A started cycle always runs to completion.
        cycle.run().await;
    }

    debug!("Detection ticker exited");
}

impl Cycle {
    async fn run(&self) -> TickReport {
        let _gate = self.gate.lock().await;
        self.in_progress.store(true, Ordering::SeqCst);
        let report = self.detect_and_broadcast().await;
        self.in_progress.store(false, Ordering::SeqCst);
        report
    }

    async fn detect_and_broadcast(&self) -> TickReport {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        self.metrics.tick();
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        debug!(tick, "Running detection");

        let produced = AssertUnwindSafe(self.producer.produce())
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(AppError::producer("Producer panicked")));

        let notification = match produced {
            Ok(Some(notification)) => notification,
            Ok(None) => {
                debug!(tick, "Nothing detected");
                return report;
            }
            Err(e) => {
                self.metrics.producer_failure();
                error!(
                    tick,
                    producer = self.producer.name(),
                    error = %e,
                    "Detection error"
                );
                report.error = Some(e.to_string());
                return report;
            }
        };

        let frame = match OutboundMessage::Notification(notification).to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.metrics.producer_failure();
                error!(tick, error = %e, "Failed to serialize notification");
                report.error = Some(e.to_string());
                return report;
            }
        };

        report.produced = true;

        let targets = self.registry.snapshot();
        report.attempted = targets.len();

        for conn in &targets {
            match conn.send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(conn_id = %conn.id, error = %e, "Notification delivery failed");
                }
            }
        }

        self.metrics
            .broadcast(report.delivered as u64, report.failed as u64);
        self.last_delivery_count
            .store(report.delivered, Ordering::Relaxed);

        info!(
            tick,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "Detection notification sent"
        );

        report
    }
}
