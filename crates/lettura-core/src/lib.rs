//! lettura-core — Sentence segmentation, vocabulary sampling, and quiz scoring.
//!
//! This crate defines the data model, the collaborator traits, and the study
//! session that the rest of lettura builds on. It performs no I/O of its own.

pub mod error;
pub mod model;
pub mod retry;
pub mod sampler;
pub mod scorer;
pub mod segment;
pub mod session;
pub mod stopwords;
pub mod traits;

pub use error::{FetchError, SessionError, StoreError, TranslationError};
pub use model::{Article, Language, LanguagePair, ResultRecord};
pub use segment::segment;
pub use session::{QuizState, SessionSettings, StudySession};
