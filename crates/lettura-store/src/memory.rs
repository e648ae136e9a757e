//! In-process result store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use lettura_core::model::ResultRecord;
use lettura_core::traits::ResultStore;
use lettura_core::StoreError;

/// Keeps records in memory. Useful for tests and single-run sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ResultRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ResultRecord>> {
        // A poisoned lock only means another thread panicked mid-push; the
        // vector itself is still valid.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn has_attempted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .iter()
            .any(|r| r.user_id == user_id && r.date == date))
    }

    async fn save_result(&self, record: ResultRecord) -> Result<Uuid, StoreError> {
        let mut records = self.lock();
        if records
            .iter()
            .any(|r| r.user_id == record.user_id && r.date == record.date)
        {
            return Err(StoreError::AlreadyRecorded {
                user_id: record.user_id,
                date: record.date,
            });
        }
        let id = record.id;
        records.push(record);
        Ok(id)
    }

    async fn history(&self, user_id: &str) -> Result<Vec<ResultRecord>, StoreError> {
        let mut history: Vec<ResultRecord> = self
            .lock()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by_key(|r| r.date);
        Ok(history)
    }
}
