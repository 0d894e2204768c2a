//! Keyword extraction — AI-prompted with a pattern/frequency fallback.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::gateway::GenerationGateway;
use crate::normalize::{normalize_whitespace, truncate_chars};

/// Generic terms never accepted from the AI path.
const GENERIC_TERMS: &[&str] = &["document", "business", "analysis", "data"];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
        "by", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "this", "that", "these", "those", "they",
        "them", "their", "there", "then", "than", "from", "into", "over", "under", "about",
        "through",
    ]
    .into_iter()
    .collect()
});

/// Curated business vocabulary for the pattern fallback.
const BUSINESS_VOCAB: &[&str] = &[
    "revenue", "profit", "sales", "growth", "market", "customer", "product", "service",
    "strategy", "technology", "digital", "platform", "solution", "system", "process",
    "management", "development", "innovation", "performance", "efficiency", "quality",
    "experience", "engagement", "acquisition", "retention", "conversion", "optimization",
    "analysis", "data", "insights", "metrics", "KPI", "ROI", "budget", "cost", "investment",
    "funding", "partnership", "collaboration", "expansion", "launch", "implementation",
    "integration", "transformation", "upgrade", "enhancement", "improvement", "increase",
    "decrease", "trend", "forecast", "target", "goal", "objective", "initiative", "project",
    "campaign", "program", "framework", "methodology", "approach", "best practices",
    "competitive advantage", "value proposition", "market share", "customer satisfaction",
    "user experience", "brand recognition", "operational excellence", "scalability",
    "sustainability", "compliance", "security", "risk management",
];

// Proper nouns stay case-sensitive; the other sweeps match case-insensitively
static PROPER_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap());
static COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\w+(?:Corp|Inc|LLC|Ltd|Company|Co)\b").unwrap());
static SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\w+(?:tion|ment|ness|ity|ing)\b").unwrap());
static VOCAB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", BUSINESS_VOCAB.join("|"))).unwrap()
});
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());
static KEYWORD_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^keywords?:?\s*").unwrap());

/// Extract up to `max_keywords` keywords, preferring the AI path and falling
/// back to pattern + frequency analysis when it yields nothing usable.
pub async fn extract_keywords(
    gateway: &GenerationGateway,
    text: &str,
    max_keywords: usize,
) -> Vec<String> {
    let clean_text = normalize_whitespace(text);

    let prompt = format!(
        "Extract {} important business keywords from this document.\n\
         Rules:\n\
         - Focus on business terms, products, metrics, companies, strategies\n\
         - Return ONLY keywords separated by commas\n\
         - No explanations or extra text\n\
         - Keywords should be 1-3 words each\n\n\
         Document: {}\n\n\
         Business keywords:",
        max_keywords,
        truncate_chars(&clean_text, 1200)
    );

    let response = gateway.generate(&prompt, 100, 0.2).await;
    let parsed = parse_keyword_response(&response, max_keywords);
    if !parsed.is_empty() {
        return parsed;
    }

    extract_keywords_basic(text, max_keywords)
}

/// Parse a comma-separated keyword response, filtering unusable candidates.
///
/// Never returns a keyword that is purely numeric, shorter than 2 characters,
/// or longer than 25.
pub fn parse_keyword_response(response: &str, max_keywords: usize) -> Vec<String> {
    let lowered = response.trim().to_lowercase();
    let stripped = KEYWORD_LABEL_RE.replace(&lowered, "");

    let mut keywords = Vec::new();
    for candidate in stripped.split(',') {
        let keyword: String = candidate
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
            .collect();
        let keyword = keyword.trim().to_string();
        let len = keyword.chars().count();

        if (2..=25).contains(&len)
            && !keyword.chars().all(|c| c.is_ascii_digit())
            && !GENERIC_TERMS.contains(&keyword.as_str())
        {
            keywords.push(keyword);
        }
    }

    keywords.truncate(max_keywords);
    keywords
}

/// Pattern + frequency fallback, no model involved.
///
/// Sweeps for proper nouns, company-suffix terms, derivational business
/// suffixes, and the curated vocabulary, then unions in the top-5 most
/// frequent content words. First-seen insertion order is preserved.
pub fn extract_keywords_basic(text: &str, max_keywords: usize) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for re in [&*PROPER_NOUN_RE, &*COMPANY_RE, &*SUFFIX_RE, &*VOCAB_RE] {
        for m in re.find_iter(text) {
            let candidate = m.as_str().trim().to_lowercase();
            let len = candidate.chars().count();
            if (3..=25).contains(&len)
                && !STOP_WORDS.contains(candidate.as_str())
                && candidate.chars().all(|c| c.is_alphabetic() || c == ' ')
                && seen.insert(candidate.clone())
            {
                keywords.push(candidate);
            }
        }
    }

    // Word frequency as backup
    let text_lower = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for m in WORD_RE.find_iter(&text_lower) {
        let word = m.as_str();
        if word.chars().count() > 3
            && !STOP_WORDS.contains(word)
            && word.chars().all(|c| c.is_alphabetic())
        {
            if !counts.contains_key(word) {
                order.push(word);
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    order.sort_by_key(|w| std::cmp::Reverse(counts[w]));

    for word in order.into_iter().take(5) {
        if seen.insert(word.to_string()) {
            keywords.push(word.to_string());
        }
    }

    keywords.truncate(max_keywords);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_response() {
        let response = "Keywords: Revenue Growth, market share, 42, x, \
                        a-very-long-keyword-over-the-limit, cloud platform";
        let keywords = parse_keyword_response(response, 10);
        assert_eq!(
            keywords,
            vec!["revenue growth", "market share", "cloud platform"]
        );
    }

    #[test]
    fn test_parse_strips_punctuation() {
        let keywords = parse_keyword_response("\"digital strategy!\", (automation)", 10);
        assert_eq!(keywords, vec!["digital strategy", "automation"]);
    }

    #[test]
    fn test_parse_rejects_generic_terms() {
        let keywords = parse_keyword_response("business, data, document, analysis, fintech", 10);
        assert_eq!(keywords, vec!["fintech"]);
    }

    #[test]
    fn test_parse_respects_cap() {
        let keywords = parse_keyword_response("alpha, beta, gamma, delta", 2);
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_keyword_bounds_hold() {
        let response = "ok, 1234567, ai, supercalifragilisticexpialidocious, retention";
        for keyword in parse_keyword_response(response, 10) {
            let len = keyword.chars().count();
            assert!((2..=25).contains(&len), "bad length: {:?}", keyword);
            assert!(!keyword.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_basic_extraction_finds_vocab_and_proper_nouns() {
        let text = "Acme Corp reported strong revenue growth. The expansion into \
                    new markets improved customer retention and market share.";
        let keywords = extract_keywords_basic(text, 20);
        assert!(keywords.iter().any(|k| k == "revenue"));
        assert!(keywords.iter().any(|k| k == "retention"));
        assert!(keywords.iter().any(|k| k.contains("acme")));
    }

    #[test]
    fn test_basic_extraction_skips_stopwords() {
        let text = "These those there then than from into over under about through";
        for keyword in extract_keywords_basic(text, 20) {
            assert!(!STOP_WORDS.contains(keyword.as_str()));
        }
    }

    #[test]
    fn test_basic_extraction_no_duplicates() {
        let text = "Revenue revenue REVENUE growth growth market market market";
        let keywords = extract_keywords_basic(text, 20);
        let unique: HashSet<&String> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());
    }

    #[test]
    fn test_basic_extraction_caps_result() {
        let text = "Revenue profit sales growth market customer product service \
                    strategy technology digital platform solution system process";
        let keywords = extract_keywords_basic(text, 5);
        assert_eq!(keywords.len(), 5);
    }
}
