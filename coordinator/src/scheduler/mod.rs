pub mod queue;
pub mod rate_limiter;
pub mod scheduler;
pub mod summary;

pub use queue::PriorityQueue;
pub use rate_limiter::RateLimiter;
pub use scheduler::{IdleReason, NotificationScheduler, TickOutcome};
pub use summary::Summary;
