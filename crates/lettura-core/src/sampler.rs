//! Vocabulary sampling for quizzes.
//!
//! A token is eligible when it is purely alphabetic, does not start with an
//! uppercase letter (a cheap proper-noun filter, checked on the original token
//! before lowercasing), and its lowercase form is not a stop word. Eligible
//! words are lowercased and deduplicated before sampling without replacement.

use std::collections::HashSet;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::model::Language;
use crate::stopwords::is_stop_word;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    // Words may carry internal apostrophes or hyphens ("l'acqua", "anti-mafia");
    // any other non-space character is a token of its own.
    TOKEN.get_or_init(|| {
        Regex::new(r"[\p{L}\p{M}\p{N}]+(?:['’\-][\p{L}\p{M}\p{N}]+)*|\S").unwrap()
    })
}

/// Split `text` into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    token_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Eligibility knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Drop tokens whose first character is uppercase.
    pub skip_capitalized: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            skip_capitalized: true,
        }
    }
}

/// Samples quiz words from article text in one language.
#[derive(Debug, Clone, Copy)]
pub struct VocabularySampler {
    language: Language,
    config: SamplerConfig,
}

impl VocabularySampler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            config: SamplerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether a single raw token may become a quiz word.
    pub fn is_eligible(&self, token: &str) -> bool {
        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !token.chars().all(char::is_alphabetic) {
            return false;
        }
        // Must run before lowercasing, or the heuristic never fires.
        if self.config.skip_capitalized && first.is_uppercase() {
            return false;
        }
        !is_stop_word(self.language, &token.to_lowercase())
    }

    /// Lowercased eligible words in first-occurrence order, without duplicates.
    pub fn eligible_words(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        tokenize(text)
            .into_iter()
            .filter(|t| self.is_eligible(t))
            .map(str::to_lowercase)
            .filter(|w| seen.insert(w.clone()))
            .collect()
    }

    /// Up to `count` distinct eligible words chosen uniformly at random.
    ///
    /// Returns every eligible word when fewer than `count` exist.
    pub fn sample_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let eligible = self.eligible_words(text);
        let picked: Vec<String> = eligible.choose_multiple(rng, count).cloned().collect();
        tracing::debug!(
            eligible = eligible.len(),
            requested = count,
            sampled = picked.len(),
            "sampled quiz words"
        );
        picked
    }

    pub fn sample(&self, text: &str, count: usize) -> Vec<String> {
        self.sample_with_rng(text, count, &mut rand::thread_rng())
    }
}

/// Sample with the default eligibility rules and the thread-local RNG.
pub fn sample(text: &str, language: Language, count: usize) -> Vec<String> {
    VocabularySampler::new(language).sample(text, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ARTICLE: &str = "Il sindaco di Torino ha inaugurato ieri il nuovo parco. \
        Il parco, secondo il sindaco, sarà aperto tutti i giorni; i cittadini \
        potranno portare i cani e giocare a calcio. Roma osserva con interesse.";

    #[test]
    fn tokenizer_splits_punctuation_and_keeps_elisions() {
        assert_eq!(
            tokenize("L'acqua, fredda!"),
            vec!["L'acqua", ",", "fredda", "!"]
        );
        assert_eq!(tokenize("anti-mafia 2024"), vec!["anti-mafia", "2024"]);
    }

    #[test]
    fn stop_words_removed_and_size_capped_by_eligible_count() {
        let sampler = VocabularySampler::new(Language::Italian);
        let mut rng = StdRng::seed_from_u64(7);
        let mut words = sampler.sample_with_rng("Il gatto mangia il pesce", 10, &mut rng);
        words.sort();
        assert_eq!(words, vec!["gatto", "mangia", "pesce"]);
    }

    #[test]
    fn capitalized_tokens_are_skipped_before_lowercasing() {
        let sampler = VocabularySampler::new(Language::Italian);
        let words = sampler.eligible_words("Gatto gatto Torino");
        assert_eq!(words, vec!["gatto"]);

        let keep = sampler.with_config(SamplerConfig {
            skip_capitalized: false,
        });
        assert_eq!(keep.eligible_words("Gatto gatto Torino"), vec!["gatto", "torino"]);
    }

    #[test]
    fn capitalized_stop_word_is_still_a_stop_word() {
        let sampler = VocabularySampler::new(Language::Italian).with_config(SamplerConfig {
            skip_capitalized: false,
        });
        assert!(!sampler.is_eligible("Il"));
    }

    #[test]
    fn non_alphabetic_tokens_are_ineligible() {
        let sampler = VocabularySampler::new(Language::Italian);
        for token in ["2024", "l'acqua", "anti-mafia", ",", "covid19", ""] {
            assert!(!sampler.is_eligible(token), "{token:?} should be ineligible");
        }
        assert!(sampler.is_eligible("città"));
    }

    #[test]
    fn sample_is_distinct_eligible_and_bounded() {
        let sampler = VocabularySampler::new(Language::Italian);
        let eligible = sampler.eligible_words(ARTICLE);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for count in [0, 1, 5, 100] {
                let words = sampler.sample_with_rng(ARTICLE, count, &mut rng);
                assert_eq!(words.len(), count.min(eligible.len()));
                let distinct: HashSet<_> = words.iter().collect();
                assert_eq!(distinct.len(), words.len());
                assert!(words.iter().all(|w| eligible.contains(w)));
            }
        }
    }

    #[test]
    fn repeated_words_count_once() {
        let sampler = VocabularySampler::new(Language::Italian);
        let eligible = sampler.eligible_words(ARTICLE);
        assert_eq!(eligible.iter().filter(|w| *w == "parco").count(), 1);
        assert_eq!(eligible.iter().filter(|w| *w == "sindaco").count(), 1);
        assert!(!eligible.contains(&"roma".to_string()));
    }

    #[test]
    fn same_seed_same_sample() {
        let sampler = VocabularySampler::new(Language::Italian);
        let a = sampler.sample_with_rng(ARTICLE, 4, &mut StdRng::seed_from_u64(42));
        let b = sampler.sample_with_rng(ARTICLE, 4, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn nothing_eligible_gives_empty_sample() {
        assert!(sample("Il la di e. Roma, Milano!", Language::Italian, 10).is_empty());
        assert!(sample("", Language::Italian, 10).is_empty());
    }
}
