use crate::models::TimerSnapshot;
use crate::repo::kv::{load_json, save_json, KvStore, StoreError};

/// Store key of the timer snapshot document
pub const SNAPSHOT_KEY: &str = "timer_snapshot";

/// Snapshot repository for key-value operations
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Load the stored snapshot, if any
    pub fn load(store: &dyn KvStore) -> Result<Option<TimerSnapshot>, StoreError> {
        load_json(store, SNAPSHOT_KEY)
    }

    /// Replace the stored snapshot
    pub fn save(store: &dyn KvStore, snapshot: &TimerSnapshot) -> Result<(), StoreError> {
        save_json(store, SNAPSHOT_KEY, snapshot)
    }

    /// Remove the snapshot (no active timer)
    pub fn clear(store: &dyn KvStore) -> Result<(), StoreError> {
        store.remove(SNAPSHOT_KEY)
    }
}
