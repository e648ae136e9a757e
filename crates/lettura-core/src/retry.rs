//! Bounded translation calls: a timeout per attempt plus a small retry budget.

use std::time::Duration;

use crate::error::TranslationError;
use crate::model::LanguagePair;
use crate::traits::Translator;

/// How hard to try before giving up on a translation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay between attempts unless the backend sends a rate-limit hint.
    pub retry_delay: Duration,
    /// Deadline for a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::ZERO,
            timeout,
        }
    }
}

/// Translate `text` through `translator`, retrying transient failures.
///
/// Permanent errors (see [`TranslationError::is_permanent`]) are returned
/// immediately. Rate-limit hints override the policy's delay.
pub async fn translate_with_retry(
    translator: &dyn Translator,
    text: &str,
    pair: LanguagePair,
    policy: &RetryPolicy,
) -> Result<String, TranslationError> {
    let mut delay = policy.retry_delay;
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            tokio::time::sleep(delay).await;
            delay = policy.retry_delay;
        }

        let outcome = tokio::time::timeout(
            policy.timeout,
            translator.translate(text, pair.source, pair.target),
        )
        .await
        .unwrap_or_else(|_| Err(TranslationError::Timeout(policy.timeout.as_secs())));

        match outcome {
            Ok(translation) => return Ok(translation),
            Err(e) if e.is_permanent() => {
                tracing::warn!(translator = translator.name(), "translation failed: {e}");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    translator = translator.name(),
                    attempt = attempt + 1,
                    "translation attempt failed: {e}"
                );
                if let Some(ms) = e.retry_after_ms() {
                    delay = Duration::from_millis(ms);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| TranslationError::EmptyResponse(text.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::model::Language;

    /// Plays back a script of outcomes, then succeeds forever.
    struct Scripted {
        script: Mutex<VecDeque<Result<String, TranslationError>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(script: Vec<Result<String, TranslationError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn translate(
            &self,
            text: &str,
            _: Language,
            _: Language,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(format!("{text}-fr")))
        }
    }

    /// Never answers.
    struct Hanging;

    #[async_trait]
    impl Translator for Hanging {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn translate(
            &self,
            _: &str,
            _: Language,
            _: Language,
        ) -> Result<String, TranslationError> {
            std::future::pending().await
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 1,
            retry_delay: Duration::from_millis(1),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let t = Scripted::new(vec![Err(TranslationError::Network("reset".into()))]);
        let out = translate_with_retry(&t, "gatto", LanguagePair::default(), &fast_policy()).await;
        assert_eq!(out.unwrap(), "gatto-fr");
        assert_eq!(t.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let t = Scripted::new(vec![
            Err(TranslationError::Network("1".into())),
            Err(TranslationError::Network("2".into())),
            Err(TranslationError::Network("3".into())),
        ]);
        let err = translate_with_retry(&t, "gatto", LanguagePair::default(), &fast_policy())
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::Network("2".into()));
        assert_eq!(t.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let t = Scripted::new(vec![Err(TranslationError::AuthenticationFailed(
            "bad key".into(),
        ))]);
        let err = translate_with_retry(&t, "gatto", LanguagePair::default(), &fast_policy())
            .await
            .unwrap_err();
        assert!(err.is_permanent());
        assert_eq!(t.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_backend_times_out() {
        let policy = RetryPolicy {
            max_retries: 1,
            retry_delay: Duration::from_millis(10),
            timeout: Duration::from_secs(3),
        };
        let err = translate_with_retry(&Hanging, "gatto", LanguagePair::default(), &policy)
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::Timeout(3));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_hint_sets_the_delay() {
        let t = Scripted::new(vec![Err(TranslationError::RateLimited {
            retry_after_ms: 5000,
        })]);
        let start = tokio::time::Instant::now();
        let out = translate_with_retry(&t, "gatto", LanguagePair::default(), &fast_policy()).await;
        assert!(out.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(5000));
    }
}
