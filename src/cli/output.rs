use serde::Serialize;
use crate::engine::StopwatchView;
use crate::models::{TaskRecord, TimerState};
use crate::utils::{format_completed_at, format_elapsed};

/// Status line for the current timer
pub fn format_status(view: &StopwatchView) -> String {
    let name = view.task_name.as_deref().unwrap_or("");
    match view.state {
        TimerState::Idle => "No task selected.".to_string(),
        TimerState::Ready => format!("Ready: {} ({})", name, view.elapsed),
        TimerState::Running => format!("Running: {} {}", name, view.elapsed),
        TimerState::Paused => format!("Paused: {} {}", name, view.elapsed),
    }
}

/// JSON shape of `stint status --json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusJson<'a> {
    pub state: TimerState,
    pub task_name: Option<&'a str>,
    pub elapsed_ms: i64,
    pub elapsed: &'a str,
    pub history_count: usize,
}

impl<'a> From<&'a StopwatchView> for StatusJson<'a> {
    fn from(view: &'a StopwatchView) -> Self {
        Self {
            state: view.state,
            task_name: view.task_name.as_deref(),
            elapsed_ms: view.elapsed_ms,
            elapsed: &view.elapsed,
            history_count: view.history_len,
        }
    }
}

/// Format the history list as a table, newest first
pub fn format_history_table(records: &[TaskRecord]) -> String {
    if records.is_empty() {
        return "No completed tasks yet.\nComplete a task to see it here.".to_string();
    }

    let rows: Vec<(String, &str, String, String)> = records.iter()
        .map(|r| (
            r.id.to_string(),
            r.name.as_str(),
            format_elapsed(r.duration_ms),
            format_completed_at(r.completed_at),
        ))
        .collect();

    let id_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).max("ID".len());
    let name_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0).max("Task".len());
    let duration_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(0).max("Duration".len());

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$} {:<name_width$} {:<duration_width$} {}\n",
        "ID", "Task", "Duration", "Completed",
    ));
    output.push_str(&format!(
        "{} {} {} {}\n",
        "-".repeat(id_width),
        "-".repeat(name_width),
        "-".repeat(duration_width),
        "-".repeat(16),
    ));
    for (id, name, duration, completed) in &rows {
        output.push_str(&format!(
            "{:<id_width$} {:<name_width$} {:<duration_width$} {}\n",
            id, name, duration, completed,
        ));
    }

    let total_ms: i64 = records.iter().map(|r| r.duration_ms).sum();
    output.push_str(&format!("\n{} task(s), {} total", records.len(), format_elapsed(total_ms)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(state: TimerState, name: Option<&str>, elapsed_ms: i64) -> StopwatchView {
        StopwatchView {
            state,
            task_name: name.map(str::to_string),
            elapsed_ms,
            elapsed: format_elapsed(elapsed_ms),
            history_len: 0,
        }
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(&view(TimerState::Idle, None, 0)), "No task selected.");
        assert_eq!(format_status(&view(TimerState::Ready, Some("Docs"), 0)), "Ready: Docs (00:00:00)");
        assert_eq!(format_status(&view(TimerState::Running, Some("Docs"), 61_000)), "Running: Docs 00:01:01");
        assert_eq!(format_status(&view(TimerState::Paused, Some("Docs"), 61_000)), "Paused: Docs 00:01:01");
    }

    #[test]
    fn test_status_json() {
        let v = view(TimerState::Running, Some("Docs"), 4_000);
        let json = serde_json::to_value(StatusJson::from(&v)).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["taskName"], "Docs");
        assert_eq!(json["elapsedMs"], 4_000);
        assert_eq!(json["elapsed"], "00:00:04");
    }

    #[test]
    fn test_history_empty_state() {
        assert!(format_history_table(&[]).starts_with("No completed tasks yet."));
    }

    #[test]
    fn test_history_table() {
        let records = vec![
            TaskRecord { id: 2, name: "Write report".to_string(), duration_ms: 3_000, completed_at: 1_704_067_200_000 },
            TaskRecord { id: 1, name: "Email".to_string(), duration_ms: 3_600_000, completed_at: 1_704_060_000_000 },
        ];
        let table = format_history_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("2  Write report 00:00:03"));
        assert!(lines[3].starts_with("1  Email        01:00:00"));
        assert!(table.ends_with("2 task(s), 01:00:03 total"));
    }
}
