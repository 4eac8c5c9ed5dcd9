// Shared helpers for CLI tests: each test gets its own HOME with an rc file
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use stint::db::DbConnection;
use stint::repo::SqliteKvStore;

/// Create a temporary HOME whose rc points at a fresh database
pub fn setup_test_env() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join(".stint");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("rc"),
        format!("data.location={}\n", db_path(&temp_dir).display()),
    )
    .unwrap();
    temp_dir
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// A `stint` command running against `temp_dir`
pub fn get_stint_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stint").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Direct access to the test database, for seeding and assertions
pub fn open_store(temp_dir: &TempDir) -> SqliteKvStore {
    SqliteKvStore::new(DbConnection::connect_at(&db_path(temp_dir)).unwrap())
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
