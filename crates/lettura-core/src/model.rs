//! Core data model types for lettura.
//!
//! Articles, languages, and the records the result store persists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A fetched article. Immutable once created by an article source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source_url: String,
    pub body: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        source_url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_url: source_url.into(),
            body: body.into(),
        }
    }

    /// Body length in characters, the unit article sources filter on.
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }
}

/// Supported study languages.
///
/// Serializes as the lowercase name and deserializes through [`FromStr`], so
/// config files may use either the name or the ISO code in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    Italian,
    French,
}

impl Language {
    /// ISO 639-1 code used by translation backends.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Italian => "it",
            Language::French => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Italian => write!(f, "italian"),
            Language::French => write!(f, "french"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "italian" | "it" => Ok(Language::Italian),
            "french" | "fr" => Ok(Language::French),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Direction of translation for a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

impl LanguagePair {
    pub fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: Language::Italian,
            target: Language::French,
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.code(), self.target.code())
    }
}

/// One sentence of the article as shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceView {
    /// 1-based position in the article.
    pub index: usize,
    pub text: String,
    /// Cached translation; kept when the sentence is hidden again.
    pub translation: Option<String>,
    pub revealed: bool,
}

impl SentenceView {
    pub fn new(index: usize, text: String) -> Self {
        Self {
            index,
            text,
            translation: None,
            revealed: false,
        }
    }

    /// The translation if the sentence is currently revealed.
    pub fn visible_translation(&self) -> Option<&str> {
        if self.revealed {
            self.translation.as_deref()
        } else {
            None
        }
    }
}

/// A quiz word and, once scored, its reference translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizWord {
    /// Lowercase form as sampled from the article.
    pub surface_form: String,
    #[serde(default)]
    pub reference_translation: Option<String>,
}

/// A persisted quiz result, one per user and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    /// Number of correct answers.
    pub score: u32,
    /// Number of words that had a reference translation.
    pub scored_count: u32,
    #[serde(default)]
    pub article_title: String,
    #[serde(default)]
    pub article_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub words: Vec<WordRecord>,
}

/// Per-word line of a [`ResultRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    #[serde(default)]
    pub user_answer: String,
    pub is_correct: bool,
    #[serde(default)]
    pub reference_translation: Option<String>,
}
