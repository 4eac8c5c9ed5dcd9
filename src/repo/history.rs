use std::rc::Rc;
use crate::models::TaskRecord;
use crate::repo::kv::{load_json, save_json, KvStore};

/// Store key of the history document
pub const HISTORY_KEY: &str = "history";

/// Completed tasks, newest first
///
/// Every mutation writes the full list back to the store. A failed write is
/// logged and the in-memory list stays authoritative for the session.
pub struct TaskHistory {
    store: Rc<dyn KvStore>,
    records: Vec<TaskRecord>,
}

impl TaskHistory {
    /// Load the history from `store`; unreadable data yields an empty list
    pub fn load(store: Rc<dyn KvStore>) -> Self {
        let records = match load_json::<Vec<TaskRecord>>(store.as_ref(), HISTORY_KEY) {
            Ok(Some(records)) => records,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to load task history, starting empty: {}", e);
                Vec::new()
            }
        };
        Self { store, records }
    }

    /// Add a record at the front of the list
    pub fn append(&mut self, record: TaskRecord) {
        log::debug!("Appending task {} ({}ms) to history", record.id, record.duration_ms);
        self.records.insert(0, record);
        self.persist();
    }

    /// Remove the record with `id`; returns false (and writes nothing) if absent
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Records in display order (newest first)
    pub fn all(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest id in the list, used to keep new ids increasing
    pub fn newest_id(&self) -> Option<i64> {
        self.records.iter().map(|r| r.id).max()
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.store.as_ref(), HISTORY_KEY, &self.records) {
            log::error!("Failed to save task history: {}", e);
        }
    }
}
