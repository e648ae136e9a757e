//! The `lettura segment` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use lettura_core::segment::segment_numbered;

pub fn execute(input: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let sentences = segment_numbered(&text);
    for (index, sentence) in &sentences {
        println!("{index}. {sentence}");
    }
    if sentences.is_empty() {
        println!("No sentences found.");
    }

    Ok(())
}
