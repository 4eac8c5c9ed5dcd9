use std::rc::Rc;
use crate::config::{Config, DEFAULT_FLUSH_INTERVAL_MS, DEFAULT_TICK_INTERVAL_MS};
use crate::engine::capability::{Confirm, Render, StopwatchView};
use crate::engine::clock::Clock;
use crate::engine::schedule::RepeatingJob;
use crate::models::{TaskRecord, TimerSnapshot, TimerState};
use crate::repo::{KvStore, SnapshotRepo, TaskHistory};
use crate::utils::format_elapsed;

/// Periods of the repeating jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopwatchOptions {
    pub tick_interval_ms: i64,
    pub flush_interval_ms: i64,
}

impl Default for StopwatchOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }
}

impl From<&Config> for StopwatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            tick_interval_ms: config.tick_interval_ms,
            flush_interval_ms: config.flush_interval_ms,
        }
    }
}

/// Result of `Stopwatch::stop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing was running or paused
    NotActive,
    /// Stopped with zero elapsed time; nothing recorded
    Discarded,
    /// Stopped and appended to history
    Recorded(TaskRecord),
}

/// Which jobs ran during a `poll`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub ticked: bool,
    pub flushed: bool,
}

/// Single-task stopwatch
///
/// Elapsed time is always recomputed from absolute timestamps:
/// `elapsed = now - real_start - accumulated_paused`, frozen at the pause
/// instant while paused. The host may be suspended at any point without
/// running code, so no in-memory counter is trusted across calls.
pub struct Stopwatch {
    store: Rc<dyn KvStore>,
    clock: Box<dyn Clock>,
    confirm: Box<dyn Confirm>,
    renderer: Option<Box<dyn Render>>,
    history: TaskHistory,
    options: StopwatchOptions,

    state: TimerState,
    task_name: Option<String>,
    real_start_ms: Option<i64>,
    accumulated_paused_ms: i64,
    pause_started_ms: Option<i64>,
    elapsed_ms: i64,

    tick_job: Option<RepeatingJob>,
    flush_job: Option<RepeatingJob>,
}

impl Stopwatch {
    /// Create an idle stopwatch and load the history from `store`
    pub fn new(
        store: Rc<dyn KvStore>,
        clock: Box<dyn Clock>,
        confirm: Box<dyn Confirm>,
        options: StopwatchOptions,
    ) -> Self {
        let history = TaskHistory::load(store.clone());
        Self {
            store,
            clock,
            confirm,
            renderer: None,
            history,
            options,
            state: TimerState::Idle,
            task_name: None,
            real_start_ms: None,
            accumulated_paused_ms: 0,
            pause_started_ms: None,
            elapsed_ms: 0,
            tick_job: None,
            flush_job: None,
        }
    }

    /// Create a stopwatch and resume whatever timer the store still holds
    pub fn open(
        store: Rc<dyn KvStore>,
        clock: Box<dyn Clock>,
        confirm: Box<dyn Confirm>,
        options: StopwatchOptions,
    ) -> Self {
        let mut stopwatch = Self::new(store, clock, confirm, options);
        stopwatch.refresh();
        stopwatch
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Render>) {
        self.renderer = Some(renderer);
        self.notify();
    }

    pub fn set_confirm(&mut self, confirm: Box<dyn Confirm>) {
        self.confirm = confirm;
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn task_name(&self) -> Option<&str> {
        self.task_name.as_deref()
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    pub fn formatted_elapsed(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }

    pub fn history(&self) -> &TaskHistory {
        &self.history
    }

    pub fn view(&self) -> StopwatchView {
        StopwatchView {
            state: self.state,
            task_name: self.task_name.clone(),
            elapsed_ms: self.elapsed_ms,
            elapsed: self.formatted_elapsed(),
            history_len: self.history.len(),
        }
    }

    /// Select the task to time next
    ///
    /// Empty names are ignored. Replacing a running or paused task needs
    /// confirmation; the replaced task is stopped (and recorded) first.
    pub fn select_task(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        if self.state.is_active() {
            let current = self.task_name.clone().unwrap_or_default();
            let prompt = format!("Task '{}' is in progress. Stop it and start a new one?", current);
            if !self.confirm.confirm(&prompt) {
                log::debug!("Replacement of '{}' declined", current);
                return false;
            }
            self.stop();
        }

        self.reset();
        self.task_name = Some(name.to_string());
        self.state = TimerState::Ready;
        log::debug!("Selected task '{}'", name);
        self.notify();
        true
    }

    /// Start a selected task, or resume a paused one
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Ready => {
                let now = self.clock.now_ms();
                self.real_start_ms = Some(now.saturating_sub(self.elapsed_ms));
                self.accumulated_paused_ms = 0;
                self.pause_started_ms = None;
                self.state = TimerState::Running;
                self.ensure_jobs(now, true);
                log::debug!("Started '{}'", self.task_name.as_deref().unwrap_or(""));
                self.persist_snapshot();
                self.notify();
                true
            }
            TimerState::Paused => self.resume(),
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        let now = self.clock.now_ms();
        self.recompute(now);
        self.pause_started_ms = Some(now);
        self.state = TimerState::Paused;
        self.ensure_jobs(now, false);
        log::debug!("Paused at {}", self.formatted_elapsed());
        self.persist_snapshot();
        self.notify();
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        let now = self.clock.now_ms();
        if let Some(paused_at) = self.pause_started_ms.take() {
            self.accumulated_paused_ms = self
                .accumulated_paused_ms
                .saturating_add(now.saturating_sub(paused_at).max(0));
        }
        // real_start stays put: it already equals now - elapsed - accumulated
        self.state = TimerState::Running;
        self.ensure_jobs(now, true);
        self.recompute(now);
        log::debug!("Resumed at {}", self.formatted_elapsed());
        self.persist_snapshot();
        self.notify();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Stop the active task, recording it if any time elapsed
    pub fn stop(&mut self) -> StopOutcome {
        if !self.state.is_active() {
            return StopOutcome::NotActive;
        }
        let now = self.clock.now_ms();
        if self.state == TimerState::Running {
            self.recompute(now);
        }
        let elapsed = self.elapsed_ms;
        let name = self.task_name.take().unwrap_or_default();

        // History is written before the snapshot is cleared
        let outcome = if elapsed > 0 {
            let record = TaskRecord::new(name, elapsed, now, self.history.newest_id());
            self.history.append(record.clone());
            StopOutcome::Recorded(record)
        } else {
            log::debug!("Stopped '{}' with no elapsed time; nothing recorded", name);
            StopOutcome::Discarded
        };

        self.reset();
        self.state = TimerState::Idle;
        if let Err(e) = SnapshotRepo::clear(self.store.as_ref()) {
            log::error!("Failed to clear timer snapshot: {}", e);
        }
        self.notify();
        outcome
    }

    /// Recompute elapsed time from the clock (running only)
    pub fn tick(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        let now = self.clock.now_ms();
        self.recompute(now);
        self.notify();
    }

    /// Restore an active timer from `snapshot`
    ///
    /// Inactive or inconsistent snapshots are ignored. A paused snapshot
    /// resumes paused, with the pause counted from `saved_at`. Applying the
    /// same snapshot twice at the same instant gives the same state; jobs that
    /// are already armed are kept rather than duplicated.
    pub fn reconcile_from_snapshot(&mut self, snapshot: &TimerSnapshot) -> bool {
        if !snapshot.active {
            return false;
        }
        if !snapshot.is_consistent() {
            log::warn!("Ignoring inconsistent timer snapshot: {:?}", snapshot);
            return false;
        }

        let now = self.clock.now_ms();
        self.task_name = snapshot.task_name.clone();
        self.real_start_ms = snapshot.real_start_time;
        self.accumulated_paused_ms = snapshot.accumulated_paused_duration.max(0);
        self.elapsed_ms = snapshot.elapsed_at(now);

        if snapshot.is_paused {
            self.state = TimerState::Paused;
            self.pause_started_ms = Some(snapshot.saved_at);
        } else {
            self.state = TimerState::Running;
            self.pause_started_ms = None;
        }
        self.ensure_jobs(now, !snapshot.is_paused);

        log::debug!(
            "Reconciled '{}' as {} at {}",
            self.task_name.as_deref().unwrap_or(""),
            self.state.as_str(),
            self.formatted_elapsed()
        );
        self.notify();
        true
    }

    /// Reload the stored snapshot and reconcile it (focus or visibility regained)
    pub fn refresh(&mut self) -> bool {
        match SnapshotRepo::load(self.store.as_ref()) {
            Ok(Some(snapshot)) => self.reconcile_from_snapshot(&snapshot),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Failed to load timer snapshot, ignoring it: {}", e);
                false
            }
        }
    }

    /// Adopt whatever the store currently holds
    ///
    /// Used by long-lived owners sharing the store with other processes: the
    /// history is reloaded, an active snapshot is reconciled, and a timer that
    /// vanished from the store (stopped elsewhere) drops to idle without being
    /// recorded again. Returns whether a timer is still active.
    pub fn sync(&mut self) -> bool {
        self.history = TaskHistory::load(self.store.clone());
        match SnapshotRepo::load(self.store.as_ref()) {
            Ok(Some(snapshot)) if snapshot.active => {
                self.reconcile_from_snapshot(&snapshot);
            }
            Ok(_) => {
                if self.state.is_active() {
                    log::debug!("Timer no longer in store; going idle");
                    self.task_name = None;
                    self.reset();
                    self.state = TimerState::Idle;
                    self.notify();
                }
            }
            Err(e) => log::warn!("Failed to load timer snapshot, keeping current state: {}", e),
        }
        self.state.is_active()
    }

    /// The snapshot describing the current state as of now
    ///
    /// While paused, the part of the pause already elapsed is folded into the
    /// accumulated duration so that the pause resumes from `saved_at` on load.
    pub fn snapshot(&self) -> TimerSnapshot {
        let now = self.clock.now_ms();
        if !self.state.is_active() {
            return TimerSnapshot::inactive(now);
        }
        let pause_so_far = match (self.state, self.pause_started_ms) {
            (TimerState::Paused, Some(paused_at)) => now.saturating_sub(paused_at).max(0),
            _ => 0,
        };
        TimerSnapshot {
            active: true,
            task_name: self.task_name.clone(),
            real_start_time: self.real_start_ms,
            accumulated_paused_duration: self.accumulated_paused_ms.saturating_add(pause_so_far),
            is_paused: self.state == TimerState::Paused,
            saved_at: now,
        }
    }

    /// Write the snapshot now (running or paused only)
    pub fn flush(&mut self) {
        if self.state.is_active() {
            self.persist_snapshot();
        }
    }

    /// Run the repeating jobs that are due
    pub fn poll(&mut self) -> PollOutcome {
        let now = self.clock.now_ms();
        let ticked = self.tick_job.as_mut().map_or(false, |job| job.fire_if_due(now));
        let flushed = self.flush_job.as_mut().map_or(false, |job| job.fire_if_due(now));
        if ticked {
            self.tick();
        }
        if flushed {
            self.flush();
        }
        PollOutcome { ticked, flushed }
    }

    /// Earliest instant a job is due, if any job is armed
    pub fn next_wakeup_ms(&self) -> Option<i64> {
        [self.tick_job.as_ref(), self.flush_job.as_ref()]
            .into_iter()
            .flatten()
            .filter(|job| !job.is_cancelled())
            .map(|job| job.next_due_ms())
            .min()
    }

    /// Remove a history record after confirmation
    pub fn remove_record(&mut self, id: i64) -> bool {
        let Some(record) = self.history.get(id) else {
            return false;
        };
        let prompt = format!("Remove '{}' ({}) from history?", record.name, format_elapsed(record.duration_ms));
        if !self.confirm.confirm(&prompt) {
            return false;
        }
        let removed = self.history.remove(id);
        self.notify();
        removed
    }

    /// Clear the history after confirmation; an empty history is left alone
    pub fn clear_history(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let prompt = format!("Clear all {} completed tasks?", self.history.len());
        if !self.confirm.confirm(&prompt) {
            return false;
        }
        self.history.clear();
        self.notify();
        true
    }

    fn recompute(&mut self, now: i64) {
        if let Some(start) = self.real_start_ms {
            self.elapsed_ms = now
                .saturating_sub(start)
                .saturating_sub(self.accumulated_paused_ms)
                .max(0);
        }
    }

    /// Arm the flush job, and the tick job only when `ticking`
    fn ensure_jobs(&mut self, now: i64, ticking: bool) {
        if ticking {
            if self.tick_job.as_ref().map_or(true, |job| job.is_cancelled()) {
                self.tick_job = Some(RepeatingJob::start(now, self.options.tick_interval_ms));
            }
        } else if let Some(mut job) = self.tick_job.take() {
            job.cancel();
        }
        if self.flush_job.as_ref().map_or(true, |job| job.is_cancelled()) {
            self.flush_job = Some(RepeatingJob::start(now, self.options.flush_interval_ms));
        }
    }

    fn cancel_jobs(&mut self) {
        for job in [self.tick_job.take(), self.flush_job.take()].iter_mut().flatten() {
            job.cancel();
        }
    }

    fn reset(&mut self) {
        self.cancel_jobs();
        self.real_start_ms = None;
        self.accumulated_paused_ms = 0;
        self.pause_started_ms = None;
        self.elapsed_ms = 0;
    }

    fn persist_snapshot(&self) {
        let snapshot = self.snapshot();
        if let Err(e) = SnapshotRepo::save(self.store.as_ref(), &snapshot) {
            log::error!("Failed to save timer snapshot: {}", e);
        }
    }

    fn notify(&mut self) {
        let view = self.view();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&view);
        }
    }
}
