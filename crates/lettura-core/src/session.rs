//! Per-learner study session.
//!
//! Holds the loaded article, the sentence reveal state, and the quiz state
//! machine `NotStarted -> InProgress -> Submitted`. Every user action is one
//! method call; collaborators are passed in rather than stored.

use chrono::NaiveDate;
use rand::Rng;

use crate::error::SessionError;
use crate::model::{Article, LanguagePair, SentenceView};
use crate::retry::{translate_with_retry, RetryPolicy};
use crate::sampler::VocabularySampler;
use crate::scorer::{score, QuizAttempt, ScoreResult};
use crate::segment::segment;
use crate::traits::{ResultStore, Translator};

/// Default number of words in a quiz.
pub const DEFAULT_QUIZ_SIZE: usize = 10;

/// Quiz lifecycle for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuizState {
    #[default]
    NotStarted,
    InProgress(QuizAttempt),
    Submitted(ScoreResult),
}

impl QuizState {
    pub fn label(&self) -> &'static str {
        match self {
            QuizState::NotStarted => "not started",
            QuizState::InProgress(_) => "in progress",
            QuizState::Submitted(_) => "submitted",
        }
    }

    /// The attempt, while the quiz is in progress.
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        match self {
            QuizState::InProgress(attempt) => Some(attempt),
            _ => None,
        }
    }

    /// The fixed result, once submitted.
    pub fn result(&self) -> Option<&ScoreResult> {
        match self {
            QuizState::Submitted(result) => Some(result),
            _ => None,
        }
    }
}

/// Settings a session is created with.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub pair: LanguagePair,
    pub quiz_size: usize,
    pub retry: RetryPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            pair: LanguagePair::default(),
            quiz_size: DEFAULT_QUIZ_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Everything the UI needs to know about one learner's session.
#[derive(Debug)]
pub struct StudySession {
    user_id: String,
    settings: SessionSettings,
    sampler: VocabularySampler,
    article: Option<Article>,
    title_translation: Option<String>,
    sentences: Vec<SentenceView>,
    quiz: QuizState,
}

impl StudySession {
    pub fn new(user_id: impl Into<String>, settings: SessionSettings) -> Self {
        let sampler = VocabularySampler::new(settings.pair.source);
        Self {
            user_id: user_id.into(),
            settings,
            sampler,
            article: None,
            title_translation: None,
            sentences: Vec::new(),
            quiz: QuizState::NotStarted,
        }
    }

    pub fn with_sampler(mut self, sampler: VocabularySampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    pub fn title_translation(&self) -> Option<&str> {
        self.title_translation.as_deref()
    }

    pub fn sentences(&self) -> &[SentenceView] {
        &self.sentences
    }

    pub fn quiz(&self) -> &QuizState {
        &self.quiz
    }

    /// Replace the current article and start a fresh quiz instance.
    ///
    /// A failed title translation is logged and leaves the translated title
    /// empty; it does not prevent studying the article.
    pub async fn load_article(&mut self, article: Article, translator: &dyn Translator) {
        self.title_translation = match translate_with_retry(
            translator,
            &article.title,
            self.settings.pair,
            &self.settings.retry,
        )
        .await
        {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("title translation unavailable: {e}");
                None
            }
        };

        self.sentences = segment(&article.body)
            .into_iter()
            .enumerate()
            .map(|(i, text)| SentenceView::new(i + 1, text))
            .collect();
        tracing::info!(
            title = %article.title,
            sentences = self.sentences.len(),
            "article loaded"
        );
        self.article = Some(article);
        self.quiz = QuizState::NotStarted;
    }

    /// Reveal or hide the 1-based sentence `index`.
    ///
    /// The first reveal translates the sentence; later reveals reuse the
    /// cached translation. Returns the translation now visible, if any.
    pub async fn toggle_sentence(
        &mut self,
        index: usize,
        translator: &dyn Translator,
    ) -> Result<Option<&str>, SessionError> {
        let len = self.sentences.len();
        if self.article.is_none() {
            return Err(SessionError::NoArticle);
        }
        if index == 0 || index > len {
            return Err(SessionError::SentenceOutOfRange { index, len });
        }
        let pair = self.settings.pair;
        let view = &mut self.sentences[index - 1];

        if view.revealed {
            view.revealed = false;
            return Ok(None);
        }
        if view.translation.is_none() {
            let t = translate_with_retry(translator, &view.text, pair, &self.settings.retry).await?;
            view.translation = Some(t);
        }
        view.revealed = true;
        Ok(view.translation.as_deref())
    }

    /// Sample quiz words from the loaded article.
    ///
    /// Refused when the learner already has a result for `today`, and when the
    /// article has no eligible words; both leave the quiz `NotStarted`.
    pub async fn start_quiz<R: Rng + ?Sized>(
        &mut self,
        store: &dyn ResultStore,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<&QuizAttempt, SessionError> {
        let Some(article) = &self.article else {
            return Err(SessionError::NoArticle);
        };
        if !matches!(self.quiz, QuizState::NotStarted) {
            return Err(SessionError::InvalidTransition {
                action: "start the quiz",
                state: self.quiz.label(),
            });
        }
        let attempted = store
            .has_attempted_on(&self.user_id, today)
            .await
            .map_err(|source| SessionError::Store {
                source,
                result: None,
            })?;
        if attempted {
            return Err(SessionError::AlreadyAttempted {
                user_id: self.user_id.clone(),
                date: today,
            });
        }

        let words = self
            .sampler
            .sample_with_rng(&article.body, self.settings.quiz_size, rng);
        if words.is_empty() {
            return Err(SessionError::InsufficientVocabulary);
        }

        self.quiz = QuizState::InProgress(QuizAttempt::new(words));
        self.quiz.attempt().ok_or(SessionError::InvalidTransition {
            action: "start the quiz",
            state: "not started",
        })
    }

    /// Record the learner's answer for `word`.
    pub fn answer(&mut self, word: &str, text: &str) -> Result<(), SessionError> {
        match &mut self.quiz {
            QuizState::InProgress(attempt) => attempt.answer(word, text),
            other => Err(SessionError::InvalidTransition {
                action: "answer",
                state: other.label(),
            }),
        }
    }

    /// Score the attempt, persist it, and freeze the quiz.
    ///
    /// If the store rejects the record the quiz is still `Submitted` and the
    /// result travels back inside [`SessionError::Store`].
    pub async fn submit(
        &mut self,
        translator: &dyn Translator,
        store: &dyn ResultStore,
        today: NaiveDate,
    ) -> Result<&ScoreResult, SessionError> {
        let attempt = match &self.quiz {
            QuizState::InProgress(attempt) => attempt,
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "submit",
                    state: other.label(),
                })
            }
        };
        let Some(article) = &self.article else {
            return Err(SessionError::NoArticle);
        };

        let result = score(attempt, translator, self.settings.pair, &self.settings.retry).await;
        let record = result.to_record(&self.user_id, today, article);
        self.quiz = QuizState::Submitted(result.clone());

        if let Err(source) = store.save_result(record).await {
            tracing::error!(user = %self.user_id, "failed to save quiz result: {source}");
            return Err(SessionError::Store {
                source,
                result: Some(Box::new(result)),
            });
        }

        self.quiz.result().ok_or(SessionError::InvalidTransition {
            action: "submit",
            state: "in progress",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    use crate::error::{StoreError, TranslationError};
    use crate::model::{Language, ResultRecord};

    struct Echo {
        calls: AtomicU32,
        known: HashMap<&'static str, &'static str>,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                known: HashMap::from([("gatto", "chat"), ("pesce", "poisson")]),
            }
        }
    }

    #[async_trait]
    impl Translator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn translate(
            &self,
            text: &str,
            _: Language,
            _: Language,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self
                .known
                .get(text)
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("[fr] {text}")))
        }
    }

    #[derive(Default)]
    struct Records {
        saved: Mutex<Vec<ResultRecord>>,
        reject: bool,
    }

    #[async_trait]
    impl ResultStore for Records {
        async fn has_attempted_on(&self, user: &str, date: NaiveDate) -> Result<bool, StoreError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.user_id == user && r.date == date))
        }

        async fn save_result(&self, record: ResultRecord) -> Result<Uuid, StoreError> {
            if self.reject {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            let id = record.id;
            self.saved.lock().unwrap().push(record);
            Ok(id)
        }

        async fn history(&self, user: &str) -> Result<Vec<ResultRecord>, StoreError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user)
                .cloned()
                .collect())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn article() -> Article {
        Article::new(
            "Il gatto",
            "https://example.it/gatto",
            "Il gatto mangia il pesce. Bene, grazie!",
        )
    }

    async fn loaded() -> (StudySession, Echo) {
        let translator = Echo::new();
        let mut session = StudySession::new("ada@example.com", SessionSettings::default());
        session.load_article(article(), &translator).await;
        (session, translator)
    }

    #[tokio::test]
    async fn load_segments_and_translates_title() {
        let (session, _) = loaded().await;
        assert_eq!(session.sentences().len(), 3);
        assert_eq!(session.sentences()[1].text, "Bene,");
        assert_eq!(session.title_translation(), Some("[fr] Il gatto"));
        assert_eq!(*session.quiz(), QuizState::NotStarted);
    }

    #[tokio::test]
    async fn toggle_translates_once_and_caches() {
        let (mut session, translator) = loaded().await;
        let before = translator.calls.load(Ordering::Relaxed);

        let shown = session.toggle_sentence(1, &translator).await.unwrap();
        assert_eq!(shown, Some("[fr] Il gatto mangia il pesce."));
        assert_eq!(session.toggle_sentence(1, &translator).await.unwrap(), None);
        assert!(session.sentences()[0].translation.is_some());
        session.toggle_sentence(1, &translator).await.unwrap();

        assert_eq!(translator.calls.load(Ordering::Relaxed), before + 1);
    }

    #[tokio::test]
    async fn toggle_out_of_range() {
        let (mut session, translator) = loaded().await;
        for index in [0, 4] {
            assert!(matches!(
                session.toggle_sentence(index, &translator).await,
                Err(SessionError::SentenceOutOfRange { len: 3, .. })
            ));
        }
    }

    #[tokio::test]
    async fn full_quiz_lifecycle() {
        let (mut session, translator) = loaded().await;
        let store = Records::default();
        let mut rng = StdRng::seed_from_u64(1);

        let attempt = session.start_quiz(&store, today(), &mut rng).await.unwrap();
        let mut words: Vec<&str> = attempt.words().collect();
        words.sort();
        assert_eq!(words, vec!["gatto", "grazie", "mangia", "pesce"]);

        session.answer("gatto", "Chat ").unwrap();
        session.answer("pesce", "poisson").unwrap();
        let result = session.submit(&translator, &store, today()).await.unwrap();
        assert_eq!(result.correct_count(), 2);
        assert_eq!(result.len(), 4);

        let saved = store.history("ada@example.com").await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].score, 2);
        assert_eq!(saved[0].date, today());
    }

    #[tokio::test]
    async fn submitted_quiz_is_read_only() {
        let (mut session, translator) = loaded().await;
        let store = Records::default();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_quiz(&store, today(), &mut rng).await.unwrap();
        session.submit(&translator, &store, today()).await.unwrap();

        assert!(matches!(
            session.answer("gatto", "chat"),
            Err(SessionError::InvalidTransition { action: "answer", .. })
        ));
        assert!(matches!(
            session.submit(&translator, &store, today()).await,
            Err(SessionError::InvalidTransition { action: "submit", .. })
        ));
        assert!(matches!(
            session.start_quiz(&store, today(), &mut rng).await,
            Err(SessionError::InvalidTransition { .. })
        ));
        assert_eq!(store.history("ada@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn already_attempted_today_is_refused() {
        let (mut session, translator) = loaded().await;
        let store = Records::default();
        let mut rng = StdRng::seed_from_u64(1);
        session.start_quiz(&store, today(), &mut rng).await.unwrap();
        session.submit(&translator, &store, today()).await.unwrap();

        let mut next = StudySession::new("ada@example.com", SessionSettings::default());
        next.load_article(article(), &translator).await;
        let err = next.start_quiz(&store, today(), &mut rng).await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyAttempted { .. }));
        assert!(err.is_warning());
        assert_eq!(*next.quiz(), QuizState::NotStarted);
        assert_eq!(store.history("ada@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn article_without_vocabulary() {
        let translator = Echo::new();
        let store = Records::default();
        let mut session = StudySession::new("ada@example.com", SessionSettings::default());
        session
            .load_article(Article::new("t", "u", "Il la di. Roma, Milano!"), &translator)
            .await;
        let err = session
            .start_quiz(&store, today(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InsufficientVocabulary));
        assert_eq!(*session.quiz(), QuizState::NotStarted);
    }

    #[tokio::test]
    async fn store_failure_keeps_the_result() {
        let (mut session, translator) = loaded().await;
        let store = Records {
            reject: true,
            ..Default::default()
        };
        session
            .start_quiz(&store, today(), &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        session.answer("gatto", "chat").unwrap();

        match session.submit(&translator, &store, today()).await {
            Err(SessionError::Store {
                result: Some(result),
                ..
            }) => assert_eq!(result.correct_count(), 1),
            other => panic!("expected a store error, got {other:?}"),
        }
        assert!(matches!(session.quiz(), QuizState::Submitted(_)));
    }

    #[tokio::test]
    async fn quiz_needs_an_article() {
        let mut session = StudySession::new("ada@example.com", SessionSettings::default());
        let store = Records::default();
        assert!(matches!(
            session
                .start_quiz(&store, today(), &mut StdRng::seed_from_u64(0))
                .await,
            Err(SessionError::NoArticle)
        ));
    }
}
