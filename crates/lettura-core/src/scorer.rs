//! Quiz attempts and scoring.
//!
//! An answer is correct when it equals the reference translation after both
//! are trimmed and lowercased. There is no fuzzy or synonym matching.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{Article, LanguagePair, QuizWord, ResultRecord, WordRecord};
use crate::retry::{translate_with_retry, RetryPolicy};
use crate::traits::Translator;

/// Sampled words and the answers typed so far, in sampling order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    entries: Vec<(String, String)>,
}

impl QuizAttempt {
    /// A fresh attempt with an empty answer for each word.
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for word in words {
            if !entries.iter().any(|(w, _)| *w == word) {
                entries.push((word, String::new()));
            }
        }
        Self { entries }
    }

    /// Record `answer` for `word`, replacing any earlier answer.
    pub fn answer(&mut self, word: &str, answer: impl Into<String>) -> Result<(), SessionError> {
        match self.entries.iter_mut().find(|(w, _)| w == word) {
            Some((_, slot)) => {
                *slot = answer.into();
                Ok(())
            }
            None => Err(SessionError::UnknownWord(word.to_string())),
        }
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(w, _)| w.as_str())
    }

    pub fn answer_for(&self, word: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, a)| a.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, a)| (w.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome for one quiz word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOutcome {
    pub word: String,
    pub user_answer: String,
    /// `None` when the translation could not be obtained.
    pub reference_translation: Option<String>,
    pub is_correct: bool,
}

/// The fixed result of a submitted quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    correct_count: u32,
    per_word: Vec<WordOutcome>,
}

impl ScoreResult {
    fn from_outcomes(per_word: Vec<WordOutcome>) -> Self {
        let correct_count = per_word.iter().filter(|o| o.is_correct).count() as u32;
        Self {
            correct_count,
            per_word,
        }
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Words that had a reference translation and therefore count.
    pub fn scored_count(&self) -> u32 {
        self.per_word
            .iter()
            .filter(|o| o.reference_translation.is_some())
            .count() as u32
    }

    pub fn per_word(&self) -> &[WordOutcome] {
        &self.per_word
    }

    pub fn outcome(&self, word: &str) -> Option<&WordOutcome> {
        self.per_word.iter().find(|o| o.word == word)
    }

    pub fn len(&self) -> usize {
        self.per_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_word.is_empty()
    }

    /// The quiz words with their reference translations filled in.
    pub fn quiz_words(&self) -> Vec<QuizWord> {
        self.per_word
            .iter()
            .map(|o| QuizWord {
                surface_form: o.word.clone(),
                reference_translation: o.reference_translation.clone(),
            })
            .collect()
    }

    /// Shape this result as a store record.
    pub fn to_record(&self, user_id: &str, date: NaiveDate, article: &Article) -> ResultRecord {
        ResultRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            date,
            score: self.correct_count,
            scored_count: self.scored_count(),
            article_title: article.title.clone(),
            article_url: article.source_url.clone(),
            created_at: Utc::now(),
            words: self
                .per_word
                .iter()
                .map(|o| WordRecord {
                    word: o.word.clone(),
                    user_answer: o.user_answer.clone(),
                    is_correct: o.is_correct,
                    reference_translation: o.reference_translation.clone(),
                })
                .collect(),
        }
    }
}

/// Trim and lowercase for comparison.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Score `attempt`, translating each word through `translator`.
///
/// A word whose translation fails after retries, or comes back blank, is
/// reported without a reference and never counts as correct.
pub async fn score(
    attempt: &QuizAttempt,
    translator: &dyn Translator,
    pair: LanguagePair,
    policy: &RetryPolicy,
) -> ScoreResult {
    let mut per_word = Vec::with_capacity(attempt.len());

    for (word, answer) in attempt.entries() {
        let reference = match translate_with_retry(translator, word, pair, policy).await {
            Ok(t) if !t.trim().is_empty() => Some(normalize_answer(&t)),
            Ok(_) => {
                tracing::warn!(word, "blank translation, word not scored");
                None
            }
            Err(e) => {
                tracing::warn!(word, "translation unavailable, word not scored: {e}");
                None
            }
        };
        let is_correct = reference
            .as_deref()
            .is_some_and(|r| r == normalize_answer(answer));

        per_word.push(WordOutcome {
            word: word.to_string(),
            user_answer: answer.trim().to_string(),
            reference_translation: reference,
            is_correct,
        });
    }

    let result = ScoreResult::from_outcomes(per_word);
    tracing::info!(
        correct = result.correct_count(),
        scored = result.scored_count(),
        total = result.len(),
        "quiz scored"
    );
    result
}
