use std::time::Duration;
use tracing::{Span, field};

pub use common::logger::{TraceId, child_span, init_tracing, root_span};

/// Records the originating monitor on the current span.
pub fn annotate_span(source: &str) {
    Span::current().record("source", field::display(source));
}

/// Runs `f` and warns if it took longer than `max`.
///
/// Sinks are synchronous, so this wraps a closure rather than a future.
pub fn warn_if_slow<F, T>(label: &'static str, max: Duration, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = std::time::Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

/// Async variant used around monitor checks.
pub async fn warn_if_slow_async<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = std::time::Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
