//! The `lettura sample` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lettura_core::model::Language;
use lettura_core::sampler::{SamplerConfig, VocabularySampler};

pub fn execute(
    input: PathBuf,
    count: usize,
    language: Language,
    seed: Option<u64>,
    keep_capitalized: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let sampler = VocabularySampler::new(language).with_config(SamplerConfig {
        skip_capitalized: !keep_capitalized,
    });
    let words = match seed {
        Some(seed) => sampler.sample_with_rng(&text, count, &mut StdRng::seed_from_u64(seed)),
        None => sampler.sample(&text, count),
    };

    if words.is_empty() {
        println!("No eligible words found.");
    }
    for word in &words {
        println!("{word}");
    }

    Ok(())
}
