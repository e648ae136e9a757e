//! Collaborator traits.
//!
//! The core never performs network or disk I/O itself. Translation backends
//! and article sources live in `lettura-providers`, result stores in
//! `lettura-store`.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{FetchError, StoreError, TranslationError};
use crate::model::{Article, Language, ResultRecord};

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// A backend that translates short texts between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable backend name (e.g. "google").
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target`.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;
}

// ---------------------------------------------------------------------------
// Article source
// ---------------------------------------------------------------------------

/// Something that can produce an article to study.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one qualifying article, or [`FetchError::NotFound`].
    async fn fetch_article(&self) -> Result<Article, FetchError>;
}

// ---------------------------------------------------------------------------
// Result store
// ---------------------------------------------------------------------------

/// Persistence for quiz results.
///
/// Implementations must keep at most one record per `(user_id, date)` and
/// perform the check and the insert of [`ResultStore::save_result`] atomically.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Whether `user_id` already has a result dated `date`.
    async fn has_attempted_on(&self, user_id: &str, date: NaiveDate) -> Result<bool, StoreError>;

    /// Whether `user_id` already has a result for the local calendar day.
    async fn has_attempted_today(&self, user_id: &str) -> Result<bool, StoreError> {
        self.has_attempted_on(user_id, chrono::Local::now().date_naive())
            .await
    }

    /// Persist a record, failing with [`StoreError::AlreadyRecorded`] if one
    /// exists for the same user and day.
    async fn save_result(&self, record: ResultRecord) -> Result<Uuid, StoreError>;

    /// All records for `user_id`, oldest first.
    async fn history(&self, user_id: &str) -> Result<Vec<ResultRecord>, StoreError>;
}
