use std::collections::BTreeMap;

use serde::Serialize;

/// Snapshot returned by `get_summary`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_delivered_last_hour: usize,
    /// RFC 3339 time of the latest delivery, or `"never"`.
    pub last_activity_timestamp: String,
    /// Deliveries per monitor within the trailing window.
    pub source_activity: BTreeMap<String, u64>,
    pub pending: usize,
    pub paused: bool,
}
