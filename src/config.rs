// Configuration loaded from ~/.stint/rc
//
// The rc file holds `key=value` lines. Unknown keys are ignored so that older
// binaries keep working against newer rc files.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Default tick period while running (display refresh)
pub const DEFAULT_TICK_INTERVAL_MS: i64 = 100;

/// Default snapshot flush period while running or paused
pub const DEFAULT_FLUSH_INTERVAL_MS: i64 = 5000;

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_location: PathBuf,
    pub tick_interval_ms: i64,
    pub flush_interval_ms: i64,
}

impl Config {
    /// Directory holding the rc file and the default database
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Failed to determine home directory")?;
        Ok(home.join(".stint"))
    }

    /// Load configuration from the rc file, falling back to defaults
    pub fn load() -> Result<Self> {
        let base = Self::base_dir()?;
        let rc_path = base.join("rc");
        let defaults = Self::defaults_in(&base);

        if !rc_path.exists() {
            return Ok(defaults);
        }

        let contents = std::fs::read_to_string(&rc_path)
            .with_context(|| format!("Failed to read config file: {}", rc_path.display()))?;
        Ok(Self::parse(&contents, &base, defaults))
    }

    fn defaults_in(base: &Path) -> Self {
        Self {
            data_location: base.join("stint.db"),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }

    /// Parse rc contents on top of `defaults`; relative paths resolve against `rc_dir`
    pub fn parse(contents: &str, rc_dir: &Path, defaults: Self) -> Self {
        let mut config = defaults;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = if path.is_relative() {
                        rc_dir.join(path)
                    } else {
                        path
                    };
                }
                "tick.interval" => {
                    if let Some(ms) = parse_interval(key, value) {
                        config.tick_interval_ms = ms;
                    }
                }
                "flush.interval" => {
                    if let Some(ms) = parse_interval(key, value) {
                        config.flush_interval_ms = ms;
                    }
                }
                other => log::debug!("Ignoring unknown config key: {}", other),
            }
        }

        config
    }
}

fn parse_interval(key: &str, value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(ms) if ms > 0 => Some(ms),
        _ => {
            log::warn!("Ignoring invalid {}: '{}' (expected milliseconds > 0)", key.trim(), value);
            None
        }
    }
}
