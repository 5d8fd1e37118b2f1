use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{Advisory, Monitor};
use crate::notification::Priority;

/// Repeat high-UV advice at most this often when the level is steady.
pub const TIP_COOLDOWN_MS: u64 = 5 * 60 * 1000;

/// Lowest UV index that produces advice.
pub const ADVICE_THRESHOLD: f64 = 6.0;

/// Supplies the current UV index, `None` when unavailable.
#[async_trait]
pub trait UvReadingSource: Send + Sync {
    async fn current_uv_index(&self) -> anyhow::Result<Option<f64>>;
}

/// Fixed reading, for demos and tests.
#[derive(Clone, Copy, Debug)]
pub struct StaticUv(pub f64);

#[async_trait]
impl UvReadingSource for StaticUv {
    async fn current_uv_index(&self) -> anyhow::Result<Option<f64>> {
        Ok(Some(self.0))
    }
}

#[derive(Debug, Default)]
struct UvState {
    last_level: f64,
    last_tip_ms: Option<u64>,
}

/// Sun-protection advice when the UV index is high.
pub struct UvHealthAdvisor<S> {
    source: S,
    interval: Duration,
    state: Mutex<UvState>,
}

impl<S: UvReadingSource> UvHealthAdvisor<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            state: Mutex::new(UvState::default()),
        }
    }

    /// Decides whether `uv` warrants advice at `now_ms`, updating the
    /// change/cooldown bookkeeping.
    pub fn evaluate(&self, uv: f64, now_ms: u64) -> Option<Advisory> {
        let mut st = self.state.lock();

        let moved = (uv - st.last_level).abs() >= 1.0;
        let cooled = st
            .last_tip_ms
            .is_none_or(|t| now_ms.saturating_sub(t) > TIP_COOLDOWN_MS);

        if !(moved || (cooled && uv >= ADVICE_THRESHOLD)) {
            return None;
        }

        let advisory = advice_for(uv);
        if advisory.is_some() {
            st.last_tip_ms = Some(now_ms);
        }
        st.last_level = uv;
        advisory
    }
}

/// UV bands: 6-7 high, 8-10 very high, above 10 extreme.
pub fn advice_for(uv: f64) -> Option<Advisory> {
    if uv < ADVICE_THRESHOLD {
        return None;
    }

    let (headline, spf, timing, priority) = if uv <= 7.0 {
        (
            "🧴 High UV detected! Protect your skin with proper precautions.",
            "Use SPF 50+ sunscreen",
            "Avoid outdoor sports 12–3PM",
            Priority::Medium,
        )
    } else if uv <= 10.0 {
        (
            "⚠️ Very High UV! Take extra precautions when going outside.",
            "Use SPF 50+ sunscreen, reapply every 2 hours",
            "Avoid outdoor activities 10AM–4PM, seek shade",
            Priority::High,
        )
    } else {
        (
            "🚨 Extreme UV! Minimize outdoor exposure.",
            "Use SPF 50+ sunscreen, wear protective clothing",
            "Stay indoors 10AM–4PM, UV can cause burns in minutes",
            Priority::Critical,
        )
    };

    Some(Advisory::new(
        format!("{headline} {spf}. {timing}."),
        priority,
    ))
}

#[async_trait]
impl<S: UvReadingSource> Monitor for UvHealthAdvisor<S> {
    fn source(&self) -> &str {
        "UV Health"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn check(&self, now_ms: u64) -> anyhow::Result<Vec<Advisory>> {
        let Some(uv) = self.source.current_uv_index().await? else {
            debug!("no UV reading available");
            return Ok(Vec::new());
        };
        Ok(self.evaluate(uv, now_ms).into_iter().collect())
    }
}
