use serde::{Deserialize, Serialize};

/// Timer state (stopwatch lifecycle)
///
/// - Idle: no task selected
/// - Ready: task selected, clock not started
/// - Running: clock advancing
/// - Paused: clock frozen, task still active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Ready,
    Running,
    Paused,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Ready => "ready",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(TimerState::Idle),
            "ready" => Some(TimerState::Ready),
            "running" => Some(TimerState::Running),
            "paused" => Some(TimerState::Paused),
            _ => None,
        }
    }

    /// Running or paused: a snapshot exists and the jobs are armed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}
