use std::sync::Arc;
use std::time::Duration;

use coordinator::{
    config::CoordinatorConfig,
    coordinator::Coordinator,
    logger::init_tracing,
    metrics::counters::Counters,
    monitor::{AirQualityTracker, MonitorRegistry, StaticAqi, StaticUv, UvHealthAdvisor},
    presenter::ConsoleSink,
    time::SystemClock,
};

/// Reads an optional numeric reading from the environment.
fn reading<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable reading");
            None
        }
    }
}

/// Registers the built-in monitors for which a reading is configured.
fn register_monitors(registry: &mut MonitorRegistry, cfg: &CoordinatorConfig) {
    if let Some(uv) = reading::<f64>("NEXAFLOW_UV_INDEX") {
        registry.register(Arc::new(UvHealthAdvisor::new(
            StaticUv(uv),
            Duration::from_millis(cfg.uv_check_interval_ms),
        )));
    }

    if let Some(aqi) = reading::<u8>("NEXAFLOW_AQI") {
        registry.register(Arc::new(AirQualityTracker::new(
            StaticAqi(aqi),
            Duration::from_millis(cfg.air_check_interval_ms),
        )));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing("nexaflow-coordinator", is_production);

    tracing::info!("Starting NexaFlow notification coordinator...");

    let cfg = CoordinatorConfig::from_env();

    let coordinator = Coordinator::new(
        cfg.clone(),
        Arc::new(SystemClock),
        Arc::new(ConsoleSink::new()),
    );

    let handle = coordinator.start();

    let mut registry = MonitorRegistry::new(coordinator.clone());
    register_monitors(&mut registry, &cfg);
    tracing::info!(monitors = registry.len(), "monitors registered");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    registry.shutdown().await;

    let summary = coordinator.get_summary();
    let counters = coordinator.counters();
    handle.shutdown().await;

    tracing::info!(
        summary = %serde_json::to_string(&summary)?,
        delivered = Counters::get(&counters.delivered),
        dropped = Counters::get(&counters.dropped_at_delivery) + Counters::get(&counters.rejected_at_enqueue),
        "final notification summary"
    );

    Ok(())
}
