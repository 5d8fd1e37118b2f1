//! Composition root for notification delivery.
//!
//! One `Coordinator` exists per running application. It is passed to every
//! monitor explicitly (clone is cheap) instead of living in a global.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::logger::{TraceId, root_span};
use crate::metrics::counters::Counters;
use crate::notification::{NotificationRequest, Priority};
use crate::presenter::{NotificationSink, Presenter};
use crate::scheduler::{NotificationScheduler, Summary, TickOutcome};
use crate::time::Clock;

/// Source label used for notices the coordinator raises itself.
pub const SYSTEM_SOURCE: &str = "System";

struct Inner {
    cfg: CoordinatorConfig,
    clock: Arc<dyn Clock>,
    scheduler: Mutex<NotificationScheduler>,
    presenter: Presenter,
    counters: Counters,
}

#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    pub fn new(
        cfg: CoordinatorConfig,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let counters = Counters::default();
        let scheduler = NotificationScheduler::new(&cfg, counters.clone());
        let presenter = Presenter::new(sink, &cfg, counters.clone());

        Self {
            inner: Arc::new(Inner {
                cfg,
                clock,
                scheduler: Mutex::new(scheduler),
                presenter,
                counters,
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.cfg
    }

    pub fn counters(&self) -> &Counters {
        &self.inner.counters
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    pub fn visible_count(&self) -> usize {
        self.inner.presenter.visible_count()
    }

    /// Requests a notification. Never fails from the caller's point of view;
    /// a full rate window silently drops the request.
    pub fn enqueue(&self, source: &str, message: &str, priority: Priority) {
        let now = self.now_ms();
        let res = self
            .inner
            .scheduler
            .lock()
            .enqueue(source, message, priority, now);

        if let Err(e) = res {
            info!(error = %e, "notification not queued");
        }
    }

    /// `enqueue` with the default (`medium`) priority.
    pub fn enqueue_default(&self, source: &str, message: &str) {
        self.enqueue(source, message, Priority::default());
    }

    pub fn get_summary(&self) -> Summary {
        let now = self.now_ms();
        self.inner.scheduler.lock().summary(now)
    }

    /// Suppresses delivery for `duration_minutes` without discarding the
    /// queue, and tells the user so.
    pub fn pause_delivery(&self, duration_minutes: u64) {
        let now = self.now_ms();
        let until = now.saturating_add(duration_minutes.saturating_mul(60_000));
        self.inner.scheduler.lock().pause_until(until);

        // Shown directly: not queued, not counted against the window.
        let notice = NotificationRequest::new(
            SYSTEM_SOURCE,
            format!("🔕 Notifications paused for {duration_minutes} minutes"),
            Priority::Low,
            now,
            0,
        );
        self.present(notice);
    }

    pub fn pause_delivery_default(&self) {
        self.pause_delivery(self.inner.cfg.default_pause_minutes);
    }

    pub fn resume_delivery(&self) {
        self.inner.scheduler.lock().resume();
    }

    pub fn is_paused(&self) -> bool {
        let now = self.now_ms();
        self.inner.scheduler.lock().is_paused(now)
    }

    /// One scheduler step: release at most one request and present it.
    pub fn tick(&self) -> TickOutcome {
        let now = self.now_ms();
        // lock released before touching the sink
        let outcome = self.inner.scheduler.lock().tick(now);

        if let TickOutcome::Delivered(req) = &outcome {
            self.present(req.clone());
        }

        outcome
    }

    /// Spawns the scheduler loop. Requires a tokio runtime.
    pub fn start(&self) -> CoordinatorHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let coordinator = self.clone();
        let period = Duration::from_millis(self.inner.cfg.tick_interval_ms);

        let span = root_span("scheduler_loop", &TraceId::default());
        let join = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                info!(period_ms = period.as_millis() as u64, "scheduler loop started");

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            coordinator.tick();
                        }
                        _ = shutdown_rx.changed() => {
                            debug!("scheduler loop received shutdown");
                            break;
                        }
                    }
                }
            }
            .instrument(span),
        );

        CoordinatorHandle {
            coordinator: self.clone(),
            shutdown_tx,
            join,
        }
    }

    fn present(&self, req: NotificationRequest) {
        // Logged and counted inside the presenter.
        let _: Result<_, CoordinatorError> = self.inner.presenter.present(req);
    }

    fn stop(&self) -> usize {
        let discarded = self.inner.scheduler.lock().clear();
        self.inner.presenter.dismiss_all();
        discarded
    }
}

/// Owns the running scheduler loop.
pub struct CoordinatorHandle {
    coordinator: Coordinator,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Stops the loop, drops pending requests and clears the screen.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            warn!(error = %e, "scheduler loop ended abnormally");
        }

        let discarded = self.coordinator.stop();
        info!(discarded, "coordinator stopped");
    }
}
