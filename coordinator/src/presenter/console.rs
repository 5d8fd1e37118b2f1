use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use super::sink::{NotificationSink, Presentation, SinkHandle};

/// Sink that renders notifications as structured log lines.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    next: AtomicU64,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for ConsoleSink {
    fn show(&self, p: &Presentation) -> anyhow::Result<SinkHandle> {
        let handle = SinkHandle(self.next.fetch_add(1, Ordering::Relaxed));
        info!(
            target: "notification",
            handle = handle.0,
            accent = p.style.accent,
            offset_px = p.offset_px,
            display_ms = p.display_for.as_millis() as u64,
            "{} {} | {}",
            p.style.icon,
            p.header,
            p.request.message
        );
        Ok(handle)
    }

    fn dismiss(&self, handle: SinkHandle) -> anyhow::Result<()> {
        info!(target: "notification", handle = handle.0, "dismissed");
        Ok(())
    }
}
