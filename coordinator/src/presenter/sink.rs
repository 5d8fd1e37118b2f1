use std::time::Duration;

use crate::notification::{NotificationRequest, Style};
use crate::time::local_time_of_day;

/// Opaque handle a sink returns for a shown notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SinkHandle(pub u64);

/// Everything a rendering environment needs to show one notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub request: NotificationRequest,
    /// Vertical position; grows with the number of visible notifications.
    pub offset_px: u32,
    pub style: Style,
    pub display_for: Duration,
    /// `"{SOURCE} • HH:MM:SS"`
    pub header: String,
}

impl Presentation {
    pub fn new(request: NotificationRequest, offset_px: u32) -> Self {
        let header = format!(
            "{} • {}",
            request.source.to_uppercase(),
            local_time_of_day(request.created_at_ms)
        );
        Self {
            style: request.priority.style(),
            display_for: request.priority.display_duration(),
            offset_px,
            header,
            request,
        }
    }
}

/// Rendering boundary. Implementations own the actual UI side effect.
pub trait NotificationSink: Send + Sync {
    fn show(&self, presentation: &Presentation) -> anyhow::Result<SinkHandle>;

    fn dismiss(&self, handle: SinkHandle) -> anyhow::Result<()>;
}
