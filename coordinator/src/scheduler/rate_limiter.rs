use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

/// One delivered notification, as remembered by the limiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub at_ms: u64,
    pub source: String,
}

/// Sliding-window cap on delivered notifications.
///
/// Only deliveries are recorded; accepted-but-queued requests never count
/// against the window.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_window: usize,
    window_ms: u64,
    /// Insertion order; a wall clock may step backwards, so not sorted by time.
    history: VecDeque<Delivery>,
}

impl RateLimiter {
    pub fn new(max_per_window: usize, window_ms: u64) -> Self {
        Self {
            max_per_window,
            window_ms,
            history: VecDeque::new(),
        }
    }

    /// Drops expired entries, then reports whether one more delivery fits.
    pub fn can_accept(&mut self, now_ms: u64) -> bool {
        self.purge(now_ms);
        self.history.len() < self.max_per_window
    }

    pub fn record(&mut self, now_ms: u64, source: &str) {
        self.history.push_back(Delivery {
            at_ms: now_ms,
            source: source.to_string(),
        });
        debug!(
            in_window = self.history.len(),
            max = self.max_per_window,
            "delivery recorded"
        );
    }

    /// Deliveries inside the window ending at `now_ms`. Does not mutate.
    pub fn delivered_in_window(&self, now_ms: u64) -> usize {
        self.live(now_ms).count()
    }

    /// Per-source delivered counts inside the window. Does not mutate.
    pub fn activity_by_source(&self, now_ms: u64) -> BTreeMap<String, u64> {
        let mut out = BTreeMap::new();
        for d in self.live(now_ms) {
            *out.entry(d.source.clone()).or_insert(0) += 1;
        }
        out
    }

    fn is_live(&self, d: &Delivery, now_ms: u64) -> bool {
        now_ms.saturating_sub(d.at_ms) < self.window_ms
    }

    fn live(&self, now_ms: u64) -> impl Iterator<Item = &Delivery> {
        self.history.iter().filter(move |d| self.is_live(d, now_ms))
    }

    fn purge(&mut self, now_ms: u64) {
        let window_ms = self.window_ms;
        let before = self.history.len();
        self.history
            .retain(|d| now_ms.saturating_sub(d.at_ms) < window_ms);
        let purged = before - self.history.len();
        if purged > 0 {
            debug!(purged, remaining = self.history.len(), "expired deliveries purged");
        }
    }
}
