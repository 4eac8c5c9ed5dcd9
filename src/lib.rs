//! Stint - a single-task stopwatch with a persisted history
//!
//! This library provides the core functionality for Stint, including:
//! - The timer reconciliation engine (start, pause, resume, stop, snapshot recovery)
//! - The task history store
//! - Key-value persistence backed by SQLite (or memory, for tests)
//! - Configuration and CLI command parsing and execution
//! - Elapsed-time formatting and duration parsing
//!
//! # Example
//!
//! ```no_run
//! use stint::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod repo;
pub mod engine;
pub mod cli;
pub mod utils;
