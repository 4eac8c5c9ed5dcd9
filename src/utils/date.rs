use chrono::{Local, TimeZone};

/// Format a completion timestamp (Unix ms) for display in local time
pub fn format_completed_at(ts_ms: i64) -> String {
    match Local.timestamp_millis_opt(ts_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}
