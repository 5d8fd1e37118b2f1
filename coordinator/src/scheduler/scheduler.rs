//! Delivery scheduler for monitor notifications.
//!
//! Responsibilities:
//! - Accept requests from monitors, subject to the trailing-window cap.
//! - Hold pending requests in priority order.
//! - On every tick, release at most one request once the minimum spacing
//!   since the previous delivery has elapsed.
//!
//! Non-responsibilities:
//! - Rendering (the presenter does this).
//! - Timers (the coordinator drives `tick` from its loop).
//!
//! Guarantees:
//! - Deliveries within any trailing window never exceed `max_per_hour`.
//! - Consecutive deliveries are at least `min_spacing_ms` apart.

use tracing::{debug, info, instrument};

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::metrics::counters::Counters;
use crate::notification::{NotificationRequest, Priority};
use crate::scheduler::queue::PriorityQueue;
use crate::scheduler::rate_limiter::RateLimiter;
use crate::scheduler::summary::Summary;
use crate::time::rfc3339;

/// Why a tick released nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleReason {
    Empty,
    Paused,
    Spacing,
}

/// Result of a single scheduler tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle(IdleReason),
    /// Head released for presentation; recorded against the rate window.
    Delivered(NotificationRequest),
    /// Head discarded because the window is already full.
    Dropped(NotificationRequest),
}

/// Owns the queue, the rate window and the spacing/pause state.
///
/// All operations take `now_ms` explicitly so behaviour is a pure function
/// of the call sequence.
pub struct NotificationScheduler {
    queue: PriorityQueue,
    limiter: RateLimiter,
    min_spacing_ms: u64,
    last_delivery_ms: Option<u64>,
    paused_until_ms: Option<u64>,
    next_seq: u64,
    counters: Counters,
}

impl NotificationScheduler {
    pub fn new(cfg: &CoordinatorConfig, counters: Counters) -> Self {
        Self {
            queue: PriorityQueue::new(),
            limiter: RateLimiter::new(cfg.max_per_hour, cfg.rate_window_ms),
            min_spacing_ms: cfg.min_spacing_ms,
            last_delivery_ms: None,
            paused_until_ms: None,
            next_seq: 0,
            counters,
        }
    }

    /// Queues a request if the rate window still has room.
    ///
    /// A rejected request is dropped, not deferred.
    #[instrument(skip(self, message), target = "scheduler")]
    pub fn enqueue(
        &mut self,
        source: &str,
        message: &str,
        priority: Priority,
        now_ms: u64,
    ) -> Result<(), CoordinatorError> {
        if !self.limiter.can_accept(now_ms) {
            Counters::bump(&self.counters.rejected_at_enqueue);
            return Err(CoordinatorError::RateLimitExceeded {
                source_label: source.to_string(),
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let req = NotificationRequest::new(source, message, priority, now_ms, seq);
        debug!(id = %req.id, pending = self.queue.len() + 1, "notification queued");
        self.queue.enqueue(req);
        Counters::bump(&self.counters.enqueued);

        Ok(())
    }

    /// Runs one scheduling step at `now_ms`.
    #[instrument(skip(self), target = "scheduler", level = "trace")]
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if self.check_paused(now_ms) {
            return TickOutcome::Idle(IdleReason::Paused);
        }

        if self.queue.is_empty() {
            return TickOutcome::Idle(IdleReason::Empty);
        }

        if let Some(last) = self.last_delivery_ms {
            if now_ms.saturating_sub(last) < self.min_spacing_ms {
                return TickOutcome::Idle(IdleReason::Spacing);
            }
        }

        let Some(head) = self.queue.dequeue() else {
            return TickOutcome::Idle(IdleReason::Empty);
        };

        // Acceptance only counted deliveries; a burst may have been admitted
        // past the cap, so the window is checked again here.
        if !self.limiter.can_accept(now_ms) {
            Counters::bump(&self.counters.dropped_at_delivery);
            info!(id = %head.id, source = %head.source, "rate window full; dropping queued notification");
            return TickOutcome::Dropped(head);
        }

        self.last_delivery_ms = Some(now_ms);
        self.limiter.record(now_ms, &head.source);
        Counters::bump(&self.counters.delivered);

        debug!(id = %head.id, priority = %head.priority, "notification released");
        TickOutcome::Delivered(head)
    }

    /// Suppresses delivery until `until_ms`. Pending requests stay queued.
    pub fn pause_until(&mut self, until_ms: u64) {
        self.paused_until_ms = Some(until_ms);
        info!(until = %rfc3339(until_ms), pending = self.queue.len(), "delivery paused");
    }

    pub fn resume(&mut self) {
        if self.paused_until_ms.take().is_some() {
            info!(pending = self.queue.len(), "delivery resumed");
        }
    }

    pub fn is_paused(&self, now_ms: u64) -> bool {
        self.paused_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Discards all pending requests.
    pub fn clear(&mut self) -> usize {
        let n = self.queue.clear();
        Counters::add(&self.counters.dropped_on_shutdown, n as u64);
        n
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn last_delivery_ms(&self) -> Option<u64> {
        self.last_delivery_ms
    }

    /// Read-only view; repeated calls with the same `now_ms` agree.
    pub fn summary(&self, now_ms: u64) -> Summary {
        Summary {
            total_delivered_last_hour: self.limiter.delivered_in_window(now_ms),
            last_activity_timestamp: self
                .last_delivery_ms
                .map(rfc3339)
                .unwrap_or_else(|| "never".to_string()),
            source_activity: self.limiter.activity_by_source(now_ms),
            pending: self.queue.len(),
            paused: self.is_paused(now_ms),
        }
    }

    fn check_paused(&mut self, now_ms: u64) -> bool {
        match self.paused_until_ms {
            Some(until) if now_ms < until => true,
            Some(_) => {
                self.paused_until_ms = None;
                info!(pending = self.queue.len(), "pause expired; delivery resumed");
                false
            }
            None => false,
        }
    }
}
