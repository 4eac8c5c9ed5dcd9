use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Persisted timer state, enough to rebuild elapsed time after a restart
///
/// Timestamps are Unix milliseconds (UTC). `accumulated_paused_duration` never
/// includes the part of a pause that is still in progress at `saved_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub active: bool,
    pub task_name: Option<String>,
    pub real_start_time: Option<i64>,
    #[serde(default)]
    pub accumulated_paused_duration: i64,
    #[serde(default)]
    pub is_paused: bool,
    pub saved_at: i64,
}

impl TimerSnapshot {
    /// Snapshot describing "no active timer"
    pub fn inactive(saved_at: i64) -> Self {
        Self {
            active: false,
            task_name: None,
            real_start_time: None,
            accumulated_paused_duration: 0,
            is_paused: false,
            saved_at,
        }
    }

    /// An active snapshot must carry a task name and a start time
    ///
    /// Timestamps must be representable as dates and the accumulated pause
    /// must not be negative. A start after `saved_at` is accepted and clamps
    /// to zero elapsed.
    pub fn is_consistent(&self) -> bool {
        if !self.active {
            return true;
        }
        let named = self.task_name.as_deref().map_or(false, |name| !name.trim().is_empty());
        let Some(start) = self.real_start_time else {
            return false;
        };
        named
            && is_valid_timestamp(start)
            && is_valid_timestamp(self.saved_at)
            && self.accumulated_paused_duration >= 0
    }

    /// Elapsed running time as of `now`, clamped at zero
    ///
    /// A paused snapshot is frozen at `saved_at`.
    pub fn elapsed_at(&self, now: i64) -> i64 {
        let Some(start) = self.real_start_time else {
            return 0;
        };
        let until = if self.is_paused { self.saved_at } else { now };
        until
            .saturating_sub(start)
            .saturating_sub(self.accumulated_paused_duration)
            .max(0)
    }
}

fn is_valid_timestamp(ms: i64) -> bool {
    Utc.timestamp_millis_opt(ms).single().is_some()
}
