//! Error types shared across lettura.
//!
//! Defined in `lettura-core` so the retry loop and the study session can
//! classify collaborator failures without string matching.

use chrono::NaiveDate;
use thiserror::Error;

use crate::scorer::ScoreResult;

/// Errors that can occur when calling a translation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The backend returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The daily/monthly character quota is used up.
    #[error("translation quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend does not translate between these languages.
    #[error("unsupported language pair: {source_code} -> {target_code}")]
    UnsupportedLanguage {
        source_code: String,
        target_code: String,
    },

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("translation timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered but the translation was empty.
    #[error("empty translation for {0:?}")]
    EmptyResponse(String),
}

impl TranslationError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            TranslationError::AuthenticationFailed(_)
                | TranslationError::QuotaExceeded(_)
                | TranslationError::UnsupportedLanguage { .. }
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            TranslationError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors produced by an article source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No article matched the source's qualifying rules.
    #[error("no qualifying article found")]
    NotFound,

    /// The remote site could not be reached or answered with an error.
    #[error("network error: {0}")]
    Network(String),

    /// A local article file could not be read.
    #[error("failed to read article: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by a result store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A result for this user and day is already recorded.
    #[error("a result for {user_id} on {date} is already recorded")]
    AlreadyRecorded { user_id: String, date: NaiveDate },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors returned by [`crate::session::StudySession`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation that needs an article was called before one was loaded.
    #[error("no article loaded")]
    NoArticle,

    /// The sentence index is not in `1..=len`.
    #[error("sentence {index} out of range (article has {len} sentences)")]
    SentenceOutOfRange { index: usize, len: usize },

    /// The action is not allowed in the current quiz state.
    #[error("cannot {action} while the quiz is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// The word is not part of the current quiz.
    #[error("{0:?} is not a quiz word")]
    UnknownWord(String),

    /// The user already has a result for today.
    #[error("{user_id} already took a quiz on {date}")]
    AlreadyAttempted { user_id: String, date: NaiveDate },

    /// The article has no word eligible for a quiz.
    #[error("the article has no eligible quiz words")]
    InsufficientVocabulary,

    #[error("translation unavailable: {0}")]
    Translation(#[from] TranslationError),

    /// The store failed. When the failure happened while saving, the
    /// computed result is carried along so it is not lost.
    #[error("result store error: {source}")]
    Store {
        #[source]
        source: StoreError,
        result: Option<Box<ScoreResult>>,
    },
}

impl SessionError {
    /// Returns `true` for conditions the user should be warned about rather
    /// than treated as failures.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SessionError::AlreadyAttempted { .. } | SessionError::InsufficientVocabulary
        )
    }
}
