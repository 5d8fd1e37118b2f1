use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, info, warn};

use super::Monitor;
use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::logger::{TraceId, annotate_span, child_span, root_span, warn_if_slow_async};
use crate::metrics::counters::Counters;

/// Single service that drives every monitor's polling timer and forwards
/// advisories to the coordinator.
pub struct MonitorRegistry {
    coordinator: Coordinator,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl MonitorRegistry {
    pub fn new(coordinator: Coordinator) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            coordinator,
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Starts polling `monitor` on its own interval. Requires a tokio runtime.
    pub fn register(&mut self, monitor: Arc<dyn Monitor>) {
        let source = monitor.source().to_string();
        let coordinator = self.coordinator.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let period = monitor.interval();

        let span = root_span("monitor", &TraceId::default());
        let join = tokio::spawn(
            async move {
                annotate_span(monitor.source());
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                info!(period_ms = period.as_millis() as u64, "monitor started");

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            run_check(monitor.as_ref(), &coordinator)
                                .instrument(child_span("monitor_check"))
                                .await
                        }
                        _ = shutdown_rx.changed() => break,
                    }
                }

                debug!("monitor stopped");
            }
            .instrument(span),
        );

        self.tasks.push((source, join));
    }

    /// Cancels every monitor timer and waits for the tasks to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);

        let (sources, joins): (Vec<String>, Vec<JoinHandle<()>>) = self.tasks.into_iter().unzip();
        for (source, res) in sources.iter().zip(join_all(joins).await) {
            if let Err(e) = res {
                warn!(source = %source, error = %e, "monitor task ended abnormally");
            }
        }

        info!(monitors = sources.len(), "monitors stopped");
    }
}

async fn run_check(monitor: &dyn Monitor, coordinator: &Coordinator) {
    let now = coordinator.now_ms();
    let checked = warn_if_slow_async(
        "monitor_check",
        Duration::from_secs(5),
        monitor.check(now),
    )
    .await;

    match checked {
        Ok(advisories) => {
            for a in advisories {
                coordinator.enqueue(monitor.source(), &a.message, a.priority);
            }
        }
        Err(e) => {
            Counters::bump(&coordinator.counters().monitor_failures);
            let err = CoordinatorError::MonitorFailure {
                source_label: monitor.source().to_string(),
                reason: e.to_string(),
            };
            warn!(error = %err, "monitor check failed");
        }
    }
}
