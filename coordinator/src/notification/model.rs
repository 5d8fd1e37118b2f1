use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoordinatorError;

/// Coarse urgency label. Controls queue order and display duration.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// urgency (`Critical` is the greatest).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Visual treatment of a priority level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub icon: &'static str,
    pub accent: &'static str,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    /// How long a presented notification stays visible.
    pub fn display_duration(self) -> Duration {
        match self {
            Priority::Low => Duration::from_secs(8),
            Priority::Medium => Duration::from_secs(12),
            Priority::High => Duration::from_secs(15),
            Priority::Critical => Duration::from_secs(20),
        }
    }

    pub fn style(self) -> Style {
        match self {
            Priority::Low => Style { icon: "ℹ️", accent: "info" },
            Priority::Medium => Style { icon: "💡", accent: "tip" },
            Priority::High => Style { icon: "⚠️", accent: "warning" },
            Priority::Critical => Style { icon: "🚨", accent: "alert" },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoordinatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(CoordinatorError::InvalidPriority(s.to_string())),
        }
    }
}

/// A pending notification. Lives only in memory, from enqueue until it is
/// delivered or dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    /// `"{source}-{created_at_ms}"`
    pub id: String,
    pub source: String,
    pub message: String,
    pub priority: Priority,
    pub created_at_ms: u64,

    /// Insertion order across all sources; FIFO tie-break within a priority.
    #[serde(skip)]
    pub seq: u64,
}

impl NotificationRequest {
    pub fn new(
        source: impl Into<String>,
        message: impl Into<String>,
        priority: Priority,
        created_at_ms: u64,
        seq: u64,
    ) -> Self {
        let source = source.into();
        Self {
            id: format!("{source}-{created_at_ms}"),
            source,
            message: message.into(),
            priority,
            created_at_ms,
            seq,
        }
    }
}
