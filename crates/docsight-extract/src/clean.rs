//! Generated-output cleaning — deduplication, minimum sentence length,
//! re-punctuation.

use std::collections::HashSet;

/// Clean raw generated text: strip an echoed prompt prefix, split on sentence
/// boundaries, drop sentences of 10 characters or fewer, deduplicate by
/// case/whitespace-normalized form (first occurrence wins), and rejoin with
/// proper punctuation.
///
/// Pure function, idempotent on its own output.
pub fn clean_generated(text: &str, original_prompt: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = if !original_prompt.is_empty() {
        text.strip_prefix(original_prompt).map(str::trim).unwrap_or(text)
    } else {
        text
    };

    let mut unique: Vec<&str> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for sentence in text.split('.') {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let normalized = sentence
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if sentence.chars().count() > 10 && seen.insert(normalized) {
            unique.push(sentence);
        }
    }

    let mut result = unique.join(". ");
    if !result.is_empty() && !result.ends_with('.') {
        result.push('.');
    }
    result
}
