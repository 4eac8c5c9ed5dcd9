// Stopwatch scenarios against a simulated clock and an in-memory store

use std::cell::RefCell;
use std::rc::Rc;
use stint::db::DbConnection;
use stint::engine::{AutoConfirm, ManualClock, StopOutcome, Stopwatch, StopwatchOptions};
use stint::models::{TimerSnapshot, TimerState};
use stint::repo::{KvStore, MemoryKvStore, SnapshotRepo, SqliteKvStore, SNAPSHOT_KEY};

const T0: i64 = 1_700_000_000_000;

fn open(store: &Rc<dyn KvStore>, clock: &ManualClock) -> Stopwatch {
    Stopwatch::open(
        store.clone(),
        Box::new(clock.clone()),
        Box::new(AutoConfirm(true)),
        StopwatchOptions::default(),
    )
}

fn memory_store() -> Rc<dyn KvStore> {
    Rc::new(MemoryKvStore::new())
}

/// Advance the clock in 100ms steps, polling like a host event loop would
fn run_for(stopwatch: &mut Stopwatch, clock: &ManualClock, ms: i64) {
    let mut left = ms;
    while left > 0 {
        let step = left.min(100);
        clock.advance(step);
        stopwatch.poll();
        left -= step;
    }
}

#[test]
fn test_write_report_scenario() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let mut sw = open(&store, &clock);

    assert!(sw.select_task("Write report"));
    assert!(sw.start());
    run_for(&mut sw, &clock, 2_000);
    assert!(sw.pause());
    run_for(&mut sw, &clock, 500);
    assert!(sw.resume());
    run_for(&mut sw, &clock, 1_000);

    let record = match sw.stop() {
        StopOutcome::Recorded(record) => record,
        other => panic!("expected a record, got {:?}", other),
    };
    assert!((record.duration_ms - 3_000).abs() <= 100, "duration {}", record.duration_ms);
    assert_eq!(sw.history().len(), 1);
    assert_eq!(sw.history().all()[0], record);
    assert_eq!(record.name, "Write report");
}

#[test]
fn test_duration_excludes_every_pause() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let mut sw = open(&store, &clock);

    sw.select_task("Interrupted");
    sw.start();
    let mut expected = 0;
    for (run, pause) in [(1_200, 300), (700, 5_000), (2_500, 60_000)] {
        run_for(&mut sw, &clock, run);
        expected += run;
        sw.pause();
        run_for(&mut sw, &clock, pause);
        sw.resume();
    }
    run_for(&mut sw, &clock, 400);
    expected += 400;

    match sw.stop() {
        StopOutcome::Recorded(record) => assert_eq!(record.duration_ms, expected),
        other => panic!("expected a record, got {:?}", other),
    }
}

#[test]
fn test_snapshot_reconciled_at_now() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    SnapshotRepo::save(store.as_ref(), &TimerSnapshot {
        active: true,
        task_name: Some("Write report".to_string()),
        real_start_time: Some(T0 - 5_000),
        accumulated_paused_duration: 1_000,
        is_paused: false,
        saved_at: T0 - 1_000,
    })
    .unwrap();

    let sw = open(&store, &clock);
    assert_eq!(sw.state(), TimerState::Running);
    assert_eq!(sw.task_name(), Some("Write report"));
    assert_eq!(sw.elapsed_ms(), 4_000);
    assert_eq!(sw.formatted_elapsed(), "00:00:04");
}

#[test]
fn test_out_of_range_snapshot_is_ignored() {
    for raw in [
        r#"{"active":true,"taskName":"x","realStartTime":-9223372036854775808,"accumulatedPausedDuration":0,"isPaused":false,"savedAt":1700000000000}"#,
        r#"{"active":true,"taskName":"x","realStartTime":1700000000000,"accumulatedPausedDuration":9223372036854775807,"isPaused":true,"savedAt":9223372036854775807}"#,
        r#"{"active":true,"taskName":"x","realStartTime":1700000000000,"accumulatedPausedDuration":-9223372036854775808,"isPaused":false,"savedAt":1700000000000}"#,
    ] {
        let store = memory_store();
        store.set(SNAPSHOT_KEY, raw).unwrap();
        let clock = ManualClock::new(T0);

        let mut sw = open(&store, &clock);
        assert_eq!(sw.state(), TimerState::Idle, "snapshot {}", raw);
        assert_eq!(sw.elapsed_ms(), 0);

        // The stopwatch stays usable and overwrites the bad snapshot
        assert!(sw.select_task("Fresh"));
        assert!(sw.start());
        run_for(&mut sw, &clock, 1_000);
        assert_eq!(sw.elapsed_ms(), 1_000);
        let snapshot = SnapshotRepo::load(store.as_ref()).unwrap().unwrap();
        assert_eq!(snapshot.task_name.as_deref(), Some("Fresh"));
    }
}

#[test]
fn test_blank_name_snapshot_records_nothing() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    SnapshotRepo::save(store.as_ref(), &TimerSnapshot {
        active: true,
        task_name: Some(String::new()),
        real_start_time: Some(T0 - 5_000),
        accumulated_paused_duration: 0,
        is_paused: false,
        saved_at: T0,
    })
    .unwrap();

    let mut sw = open(&store, &clock);
    assert_eq!(sw.state(), TimerState::Idle);
    assert_eq!(sw.stop(), StopOutcome::NotActive);
    assert!(sw.history().is_empty());
}

#[test]
fn test_reconcile_is_idempotent() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let snapshot = TimerSnapshot {
        active: true,
        task_name: Some("Task".to_string()),
        real_start_time: Some(T0 - 42_000),
        accumulated_paused_duration: 2_000,
        is_paused: true,
        saved_at: T0 - 10_000,
    };

    let mut sw = open(&store, &clock);
    sw.reconcile_from_snapshot(&snapshot);
    let first = (sw.state(), sw.elapsed_ms(), sw.snapshot());
    sw.reconcile_from_snapshot(&snapshot);
    let second = (sw.state(), sw.elapsed_ms(), sw.snapshot());

    assert_eq!(first, second);
    assert_eq!(first.1, 30_000);
}

#[test]
fn test_restart_mid_run_loses_nothing() {
    let store = memory_store();
    let clock = ManualClock::new(T0);

    {
        let mut sw = open(&store, &clock);
        sw.select_task("Long task");
        sw.start();
        run_for(&mut sw, &clock, 7_300);
        // Process killed here: no stop, no final flush
    }

    // Suspended for a minute, then reopened
    clock.advance(60_000);
    let mut sw = open(&store, &clock);
    assert_eq!(sw.state(), TimerState::Running);
    assert_eq!(sw.elapsed_ms(), 67_300);

    run_for(&mut sw, &clock, 700);
    assert_eq!(sw.elapsed_ms(), 68_000);
}

#[test]
fn test_restart_while_paused_keeps_pause() {
    let store = memory_store();
    let clock = ManualClock::new(T0);

    {
        let mut sw = open(&store, &clock);
        sw.select_task("Paused task");
        sw.start();
        run_for(&mut sw, &clock, 4_000);
        sw.pause();
        // Periodic flushes while paused
        run_for(&mut sw, &clock, 12_000);
    }

    clock.advance(3_600_000);
    let mut sw = open(&store, &clock);
    assert_eq!(sw.state(), TimerState::Paused);
    assert_eq!(sw.elapsed_ms(), 4_000);

    sw.resume();
    run_for(&mut sw, &clock, 1_000);
    match sw.stop() {
        StopOutcome::Recorded(record) => assert_eq!(record.duration_ms, 5_000),
        other => panic!("expected a record, got {:?}", other),
    }
}

#[test]
fn test_stop_with_zero_elapsed_leaves_history() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let mut sw = open(&store, &clock);

    sw.select_task("Done");
    sw.start();
    run_for(&mut sw, &clock, 1_000);
    sw.stop();
    assert_eq!(sw.history().len(), 1);

    sw.select_task("Instant");
    sw.start();
    assert_eq!(sw.stop(), StopOutcome::Discarded);
    assert_eq!(sw.history().len(), 1);
}

#[test]
fn test_remove_unknown_and_clear() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let mut sw = open(&store, &clock);

    for name in ["a", "b", "c"] {
        sw.select_task(name);
        sw.start();
        run_for(&mut sw, &clock, 1_000);
        sw.stop();
    }
    let before = sw.history().all().to_vec();
    assert_eq!(before.len(), 3);
    // Ids increase with completion time
    assert!(before[0].id > before[1].id && before[1].id > before[2].id);

    assert!(!sw.remove_record(12345));
    assert_eq!(sw.history().all(), before.as_slice());

    assert!(sw.clear_history());
    assert!(sw.history().is_empty());

    // Persisted: a reopened stopwatch sees the empty history
    let reopened = open(&store, &clock);
    assert!(reopened.history().is_empty());
}

#[test]
fn test_confirmation_prompts() {
    let store = memory_store();
    let clock = ManualClock::new(T0);
    let prompts: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let log = prompts.clone();
    let mut sw = Stopwatch::open(
        store.clone(),
        Box::new(clock.clone()),
        Box::new(move |prompt: &str| {
            log.borrow_mut().push(prompt.to_string());
            false
        }),
        StopwatchOptions::default(),
    );

    sw.select_task("First");
    sw.start();
    run_for(&mut sw, &clock, 1_000);
    assert!(!sw.select_task("Second"));
    assert_eq!(sw.task_name(), Some("First"));
    assert_eq!(sw.state(), TimerState::Running);

    sw.stop();
    let id = sw.history().all()[0].id;
    assert!(!sw.remove_record(id));
    assert!(!sw.clear_history());
    assert_eq!(sw.history().len(), 1);

    assert_eq!(prompts.borrow().len(), 3);
    assert!(prompts.borrow()[0].contains("First"));
}

#[test]
fn test_unavailable_store_does_not_interrupt() {
    let memory = Rc::new(MemoryKvStore::new());
    let store: Rc<dyn KvStore> = memory.clone();
    let clock = ManualClock::new(T0);
    let mut sw = open(&store, &clock);

    memory.set_available(false);
    sw.select_task("Offline");
    assert!(sw.start());
    run_for(&mut sw, &clock, 6_000);
    assert!(sw.pause());
    match sw.stop() {
        StopOutcome::Recorded(record) => assert_eq!(record.duration_ms, 6_000),
        other => panic!("expected a record, got {:?}", other),
    }
    assert_eq!(sw.history().len(), 1);
}

#[test]
fn test_sqlite_backed_restart() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stint.db");
    let clock = ManualClock::new(T0);

    {
        let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::new(DbConnection::connect_at(&db_path).unwrap()));
        let mut sw = open(&store, &clock);
        sw.select_task("Persisted");
        sw.start();
        run_for(&mut sw, &clock, 2_000);
        sw.pause();
    }

    clock.advance(10_000);
    let store: Rc<dyn KvStore> = Rc::new(SqliteKvStore::new(DbConnection::connect_at(&db_path).unwrap()));
    let mut sw = open(&store, &clock);
    assert_eq!(sw.state(), TimerState::Paused);
    assert_eq!(sw.task_name(), Some("Persisted"));
    assert_eq!(sw.elapsed_ms(), 2_000);

    sw.resume();
    run_for(&mut sw, &clock, 500);
    sw.stop();
    let reopened = open(&store, &clock);
    assert_eq!(reopened.history().len(), 1);
    assert_eq!(reopened.history().all()[0].duration_ms, 2_500);
}
