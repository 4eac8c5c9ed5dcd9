use clap::{Parser, Subcommand};
use std::rc::Rc;
use crate::config::Config;
use crate::db::DbConnection;
use crate::engine::{AutoConfirm, StopOutcome, Stopwatch, StopwatchOptions, SystemClock};
use crate::models::TimerState;
use crate::repo::{KvStore, SqliteKvStore};
use crate::cli::error::{user_error, validate_non_empty, validate_record_id};
use crate::cli::output::{format_history_table, format_status, StatusJson};
use crate::cli::prompt::StdinConfirm;
use crate::cli::watch::handle_watch;
use crate::utils::format_elapsed;
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "stint")]
#[command(about = "Stint - a single-task stopwatch with a history of completed tasks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select a task and start timing it (without a name, resumes a paused task)
    Start {
        /// Replace an active task without asking
        #[arg(short = 'y', long)]
        yes: bool,
        /// Task name (e.g., "Write report")
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Pause the running task, or resume it if paused
    Pause,
    /// Resume a paused task
    Resume,
    /// Stop timing and record the task in history
    Stop,
    /// Show the current timer
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List completed tasks, newest first
    History {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Remove a completed task from history
    Remove {
        /// Record ID (as shown by `stint history`)
        id: String,
        /// Remove without confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Clear the whole history
    Clear {
        /// Clear without confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show a live display of the current timer
    Watch {
        /// Stop watching after this long (e.g., "30s", "1h30m")
        #[arg(long = "for")]
        duration: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let mut stopwatch = open_stopwatch(&config)?;

    match cli.command {
        Commands::Start { yes, name } => handle_start(&mut stopwatch, name, yes),
        Commands::Pause => handle_pause(&mut stopwatch),
        Commands::Resume => handle_resume(&mut stopwatch),
        Commands::Stop => handle_stop(&mut stopwatch),
        Commands::Status { json } => handle_status(&stopwatch, json),
        Commands::History { json } => handle_history(&stopwatch, json),
        Commands::Remove { id, yes } => handle_remove(&mut stopwatch, id, yes),
        Commands::Clear { yes } => handle_clear(&mut stopwatch, yes),
        Commands::Watch { duration } => handle_watch(&mut stopwatch, duration),
    }
}

/// Open the configured store and reconcile any timer left running
fn open_stopwatch(config: &Config) -> Result<Stopwatch> {
    let conn = DbConnection::connect(config)
        .context("Failed to connect to database")?;
    let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::new(conn));

    Ok(Stopwatch::open(
        store,
        Box::new(SystemClock),
        Box::new(StdinConfirm),
        StopwatchOptions::from(config),
    ))
}

/// Handle `stint start [<name>]`
fn handle_start(stopwatch: &mut Stopwatch, name: Vec<String>, yes: bool) -> Result<()> {
    if yes {
        stopwatch.set_confirm(Box::new(AutoConfirm(true)));
    }

    let name = name.join(" ");
    if validate_non_empty(&name, "Task name").is_err() {
        // No name: resume whatever is paused
        match stopwatch.state() {
            TimerState::Paused => {
                stopwatch.resume();
                println!("Resumed timing: {} ({})", current_name(stopwatch), stopwatch.formatted_elapsed());
            }
            TimerState::Running => {
                println!("Already timing: {} ({})", current_name(stopwatch), stopwatch.formatted_elapsed());
            }
            TimerState::Idle | TimerState::Ready => {
                println!("No task selected. Use `stint start <name>` to start one.");
            }
        }
        return Ok(());
    }

    let previous = stopwatch.history().newest_id();
    if !stopwatch.select_task(&name) {
        println!("Cancelled. Still timing: {} ({})", current_name(stopwatch), stopwatch.formatted_elapsed());
        return Ok(());
    }
    if let Some(record) = stopwatch.history().all().first() {
        if Some(record.id) != previous {
            println!("Stopped timing: {} ({}), recorded as {}", record.name, format_elapsed(record.duration_ms), record.id);
        }
    }

    stopwatch.start();
    println!("Started timing: {}", current_name(stopwatch));
    Ok(())
}

/// Handle `stint pause` - toggles between running and paused
fn handle_pause(stopwatch: &mut Stopwatch) -> Result<()> {
    match stopwatch.state() {
        TimerState::Running => {
            stopwatch.pause();
            println!("Paused: {} at {}", current_name(stopwatch), stopwatch.formatted_elapsed());
        }
        TimerState::Paused => {
            stopwatch.resume();
            println!("Resumed timing: {} ({})", current_name(stopwatch), stopwatch.formatted_elapsed());
        }
        TimerState::Idle | TimerState::Ready => {
            println!("No task is currently running.");
        }
    }
    Ok(())
}

/// Handle `stint resume`
fn handle_resume(stopwatch: &mut Stopwatch) -> Result<()> {
    if stopwatch.resume() {
        println!("Resumed timing: {} ({})", current_name(stopwatch), stopwatch.formatted_elapsed());
    } else {
        println!("No paused task to resume.");
    }
    Ok(())
}

/// Handle `stint stop`
fn handle_stop(stopwatch: &mut Stopwatch) -> Result<()> {
    let name = current_name(stopwatch).to_string();
    match stopwatch.stop() {
        StopOutcome::Recorded(record) => {
            println!("Stopped timing: {} ({}), recorded as {}", record.name, format_elapsed(record.duration_ms), record.id);
        }
        StopOutcome::Discarded => {
            println!("Stopped timing: {} (no time elapsed, nothing recorded)", name);
        }
        StopOutcome::NotActive => {
            println!("No task is currently running.");
        }
    }
    Ok(())
}

/// Handle `stint status`
fn handle_status(stopwatch: &Stopwatch, json: bool) -> Result<()> {
    let view = stopwatch.view();
    if json {
        let output = serde_json::to_string_pretty(&StatusJson::from(&view))
            .context("Failed to serialize status")?;
        println!("{}", output);
    } else {
        println!("{}", format_status(&view));
    }
    Ok(())
}

/// Handle `stint history`
fn handle_history(stopwatch: &Stopwatch, json: bool) -> Result<()> {
    let records = stopwatch.history().all();
    if json {
        let output = serde_json::to_string_pretty(records)
            .context("Failed to serialize history")?;
        println!("{}", output);
    } else {
        println!("{}", format_history_table(records));
    }
    Ok(())
}

/// Handle `stint remove <id>`
fn handle_remove(stopwatch: &mut Stopwatch, id_str: String, yes: bool) -> Result<()> {
    let id = match validate_record_id(&id_str) {
        Ok(id) => id,
        Err(e) => user_error(&e),
    };
    let Some(record) = stopwatch.history().get(id).cloned() else {
        user_error(&format!("Record {} not found", id));
    };

    if yes {
        stopwatch.set_confirm(Box::new(AutoConfirm(true)));
    }
    if stopwatch.remove_record(id) {
        println!("Removed {}: {} ({})", record.id, record.name, format_elapsed(record.duration_ms));
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

/// Handle `stint clear`
fn handle_clear(stopwatch: &mut Stopwatch, yes: bool) -> Result<()> {
    let count = stopwatch.history().len();
    if count == 0 {
        println!("History is already empty.");
        return Ok(());
    }

    if yes {
        stopwatch.set_confirm(Box::new(AutoConfirm(true)));
    }
    if stopwatch.clear_history() {
        println!("Cleared {} completed task(s).", count);
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

fn current_name(stopwatch: &Stopwatch) -> &str {
    stopwatch.task_name().unwrap_or("")
}
