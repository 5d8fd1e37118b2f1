use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{Advisory, Monitor};
use crate::notification::Priority;

/// Supplies the current air-quality index on the 1 (good) to 5 (very poor)
/// scale.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn current_aqi(&self) -> anyhow::Result<Option<u8>>;
}

#[derive(Clone, Copy, Debug)]
pub struct StaticAqi(pub u8);

#[async_trait]
impl AirQualitySource for StaticAqi {
    async fn current_aqi(&self) -> anyhow::Result<Option<u8>> {
        Ok(Some(self.0))
    }
}

/// Advises when air quality changes to moderate or worse.
pub struct AirQualityTracker<S> {
    source: S,
    interval: Duration,
    last_aqi: Mutex<u8>,
}

impl<S: AirQualitySource> AirQualityTracker<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            last_aqi: Mutex::new(0),
        }
    }

    /// Only a change in AQI can produce advice.
    pub fn evaluate(&self, aqi: u8) -> Option<Advisory> {
        let mut last = self.last_aqi.lock();
        if *last == aqi {
            return None;
        }
        *last = aqi;
        advice_for(aqi)
    }
}

pub fn advice_for(aqi: u8) -> Option<Advisory> {
    let (headline, advice, priority) = match aqi {
        3 => (
            "⚠️ Moderate air quality - take precautions",
            "Sensitive groups should limit outdoor exercise",
            Priority::Medium,
        ),
        4 => (
            "😷 Poor air quality - wear a mask outdoors",
            "Limit outdoor activities, especially exercise",
            Priority::High,
        ),
        5 => (
            "🚨 Very poor air quality - stay indoors!",
            "Avoid all outdoor activities",
            Priority::Critical,
        ),
        _ => return None,
    };

    Some(Advisory::new(format!("{headline}. {advice}."), priority))
}

#[async_trait]
impl<S: AirQualitySource> Monitor for AirQualityTracker<S> {
    fn source(&self) -> &str {
        "Air Quality"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn check(&self, _now_ms: u64) -> anyhow::Result<Vec<Advisory>> {
        let Some(aqi) = self.source.current_aqi().await? else {
            debug!("no air quality reading available");
            return Ok(Vec::new());
        };
        Ok(self.evaluate(aqi).into_iter().collect())
    }
}
