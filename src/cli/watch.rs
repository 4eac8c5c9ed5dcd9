// Live display: polls the stopwatch jobs and redraws one terminal line

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use anyhow::{Context, Result};
use crate::engine::{Render, Stopwatch, StopwatchView};
use crate::cli::output::format_status;
use crate::utils::parse_duration;

/// How often the store is re-read for changes made by other invocations
const SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// Longest single sleep, so `--for` and syncing stay responsive
const MAX_SLEEP_MS: i64 = 250;

/// Redraws the status line in place
pub struct LineRenderer {
    last: String,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self { last: String::new() }
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Render for LineRenderer {
    fn render(&mut self, view: &StopwatchView) {
        let line = format_status(view);
        if line == self.last {
            return;
        }
        let mut stdout = io::stdout();
        // Clear the line, then redraw without a newline
        let _ = write!(stdout, "\r\x1b[2K{}", line);
        let _ = stdout.flush();
        self.last = line;
    }
}

/// Handle `stint watch [--for <duration>]`
pub fn handle_watch(stopwatch: &mut Stopwatch, duration: Option<String>) -> Result<()> {
    let limit = match duration {
        Some(expr) => Some(parse_duration(&expr).context("Invalid --for duration")?),
        None => None,
    };

    if !stopwatch.state().is_active() {
        println!("{}", format_status(&stopwatch.view()));
        return Ok(());
    }

    if let Err(e) = enable_ansi_support::enable_ansi_support() {
        log::debug!("ANSI support unavailable (code {})", e);
    }
    stopwatch.set_renderer(Box::new(LineRenderer::new()));

    let started = Instant::now();
    let mut last_sync = Instant::now();
    loop {
        if last_sync.elapsed() >= SYNC_INTERVAL {
            last_sync = Instant::now();
            if !stopwatch.sync() {
                println!();
                println!("Timer stopped.");
                return Ok(());
            }
        }

        stopwatch.poll();

        let watched_ms = started.elapsed().as_millis() as i64;
        let remaining_ms = match limit {
            Some(limit_ms) if watched_ms >= limit_ms => break,
            Some(limit_ms) => limit_ms - watched_ms,
            None => i64::MAX,
        };

        let now = stopwatch.now_ms();
        let until_due = stopwatch
            .next_wakeup_ms()
            .map(|due| due - now)
            .unwrap_or(MAX_SLEEP_MS);
        let sleep_ms = until_due.min(remaining_ms).clamp(1, MAX_SLEEP_MS);
        thread::sleep(Duration::from_millis(sleep_ms as u64));
    }

    stopwatch.flush();
    println!();
    Ok(())
}
