//! JSON file result store.
//!
//! All records live in a single pretty-printed JSON array. Every mutation
//! rewrites the whole file through a temporary sibling and a rename, so a
//! crash mid-write leaves the previous contents in place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use lettura_core::model::ResultRecord;
use lettura_core::traits::ResultStore;
use lettura_core::StoreError;

/// Result store backed by one JSON file.
///
/// A missing file reads as an empty store. The internal lock serializes the
/// read-check-write sequence of `save_result` within this process.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn persist(&self, records: &[ResultRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn has_attempted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(records
            .iter()
            .any(|r| r.user_id == user_id && r.date == date))
    }

    async fn save_result(&self, record: ResultRecord) -> Result<Uuid, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
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
        tracing::debug!(user = %record.user_id, date = %record.date, %id, "saving result");
        records.push(record);
        self.persist(&records).await?;
        Ok(id)
    }

    async fn history(&self, user_id: &str) -> Result<Vec<ResultRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut history: Vec<ResultRecord> = self
            .load()
            .await?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        history.sort_by_key(|r| r.date);
        Ok(history)
    }
}
