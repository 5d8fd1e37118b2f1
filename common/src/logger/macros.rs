use super::TraceId;
use tracing::{Level, Span, field};

/// Create a root span for a tick / monitor run / shutdown sequence.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        source = field::Empty
    )
}

/// Create a child span (inherits trace_id automatically)
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "child", name = %name, source = field::Empty)
}
