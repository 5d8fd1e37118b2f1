use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility.
#[derive(Clone, Default, Debug)]
pub struct Counters {
    pub enqueued: Arc<AtomicU64>,
    pub delivered: Arc<AtomicU64>,

    // drop reasons
    pub rejected_at_enqueue: Arc<AtomicU64>,
    pub dropped_at_delivery: Arc<AtomicU64>,
    pub dropped_on_shutdown: Arc<AtomicU64>,

    pub presentation_failures: Arc<AtomicU64>,
    pub monitor_failures: Arc<AtomicU64>,
}

impl Counters {
    pub fn bump(c: &AtomicU64) {
        c.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(c: &AtomicU64, n: u64) {
        c.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(c: &AtomicU64) -> u64 {
        c.load(Ordering::Relaxed)
    }
}
