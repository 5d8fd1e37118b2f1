//! Periodic checks that decide whether the user should be told something.

pub mod air_quality;
pub mod registry;
pub mod uv;

use std::time::Duration;

use async_trait::async_trait;

use crate::notification::Priority;

pub use air_quality::{AirQualitySource, AirQualityTracker, StaticAqi};
pub use registry::MonitorRegistry;
pub use uv::{StaticUv, UvHealthAdvisor, UvReadingSource};

/// A notification a monitor wants shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advisory {
    pub message: String,
    pub priority: Priority,
}

impl Advisory {
    pub fn new(message: impl Into<String>, priority: Priority) -> Self {
        Self {
            message: message.into(),
            priority,
        }
    }
}

#[async_trait]
pub trait Monitor: Send + Sync {
    /// Label shown on notifications and used for per-source activity.
    fn source(&self) -> &str;

    fn interval(&self) -> Duration;

    async fn check(&self, now_ms: u64) -> anyhow::Result<Vec<Advisory>>;
}
