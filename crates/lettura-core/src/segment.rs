//! Sentence segmentation.
//!
//! A boundary is `.`, `!`, `?` or `,` followed by whitespace. The comma counts
//! as a terminator, so clauses are revealed one at a time.

use std::sync::OnceLock;

use regex::Regex;

fn boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?,]\s+").unwrap())
}

/// Split `text` into sentences.
///
/// Each sentence keeps its terminating punctuation and is trimmed; pieces
/// that are only whitespace are dropped, so empty input gives an empty vec.
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary().find_iter(text) {
        // The terminator is a single ASCII byte.
        push_piece(&mut sentences, &text[start..m.start() + 1]);
        start = m.end();
    }
    push_piece(&mut sentences, &text[start..]);

    tracing::debug!(count = sentences.len(), "segmented text");
    sentences
}

/// Same as [`segment`], paired with 1-based indices.
pub fn segment_numbered(text: &str) -> Vec<(usize, String)> {
    segment(text)
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i + 1, s))
        .collect()
}

fn push_piece(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}
