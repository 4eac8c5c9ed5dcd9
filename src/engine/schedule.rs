/// A cancellable repeating job, polled by its owner
///
/// Fires at most once per poll. Periods missed while the process was
/// suspended are skipped rather than replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingJob {
    period_ms: i64,
    next_due_ms: i64,
    cancelled: bool,
}

impl RepeatingJob {
    /// Arm a job whose first run is one period after `now`
    pub fn start(now: i64, period_ms: i64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now + period_ms,
            cancelled: false,
        }
    }

    /// Stop the job; cancelling twice is a no-op
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> i64 {
        self.next_due_ms
    }

    /// Returns true if the job is due at `now`, and schedules the next run
    pub fn fire_if_due(&mut self, now: i64) -> bool {
        if self.cancelled || now < self.next_due_ms {
            return false;
        }
        let missed = (now - self.next_due_ms) / self.period_ms;
        self.next_due_ms += (missed + 1) * self.period_ms;
        true
    }
}
