use thiserror::Error;

/// Failure modes of the notification layer.
///
/// None of these reach monitors: `enqueue`, `pause_delivery` and
/// `get_summary` swallow them and log instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("rate limit exceeded; notification from {source_label} dropped")]
    RateLimitExceeded { source_label: String },

    #[error("presentation failed: {0}")]
    PresentationFailure(String),

    #[error("unknown priority: {0}")]
    InvalidPriority(String),

    #[error("invalid config value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("monitor {source_label} failed: {reason}")]
    MonitorFailure { source_label: String, reason: String },
}
