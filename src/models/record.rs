use serde::{Deserialize, Serialize};

/// A completed task in the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub name: String,
    pub duration_ms: i64,
    pub completed_at: i64,
}

impl TaskRecord {
    /// Create a record completed at `now`
    ///
    /// `newest_id` is the id of the most recent existing record; ids are derived
    /// from the completion time but always increase.
    pub fn new(name: String, duration_ms: i64, now: i64, newest_id: Option<i64>) -> Self {
        let id = match newest_id {
            Some(last) if last >= now => last + 1,
            _ => now,
        };
        Self {
            id,
            name,
            duration_ms: duration_ms.max(0),
            completed_at: now,
        }
    }
}
