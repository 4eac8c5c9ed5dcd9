// Capabilities injected into the stopwatch: confirmation and rendering

use crate::models::TimerState;

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers every prompt the same way (`-y` style)
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        log::debug!("Auto-answering '{}' with {}", prompt, self.0);
        self.0
    }
}

/// What a presentation layer needs to draw the stopwatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchView {
    pub state: TimerState,
    pub task_name: Option<String>,
    pub elapsed_ms: i64,
    pub elapsed: String,
    pub history_len: usize,
}

/// Receives a fresh view after every applied transition and every tick
pub trait Render {
    fn render(&mut self, view: &StopwatchView);
}

impl<F> Render for F
where
    F: FnMut(&StopwatchView),
{
    fn render(&mut self, view: &StopwatchView) {
        self(view)
    }
}
