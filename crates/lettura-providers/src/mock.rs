//! Mock translator for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lettura_core::model::Language;
use lettura_core::traits::Translator;
use lettura_core::TranslationError;

/// A dictionary-backed translator that never touches the network.
///
/// Unknown texts are echoed back with a `[target]` prefix.
pub struct MockTranslator {
    /// Map of source text → translation.
    dictionary: HashMap<String, String>,
    /// Texts that always fail with a network error.
    failing: HashSet<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Texts requested, in order.
    requests: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(dictionary: HashMap<String, String>) -> Self {
        Self {
            dictionary,
            failing: HashSet::new(),
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Build from `(source, translation)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Make `text` fail on every call.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }

        if self.failing.contains(text) {
            return Err(TranslationError::Network(format!("mock failure for {text}")));
        }

        Ok(self
            .dictionary
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {text}", target.code())))
    }
}
