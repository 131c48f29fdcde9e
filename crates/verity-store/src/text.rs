//! Text analysis shared by retrieval, scoring and the embedding model
//!
//! Everything here is deterministic: the same input always yields the same
//! terms in the same order, which keeps scores and rationales reproducible.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Letter and digit runs in any script, hyphenated compounds kept whole.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*").expect("word regex"));

/// Integers and decimals, thousands separators allowed.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("number regex"));

/// Negation cues, including contracted forms ("isn't", "didn't").
static NEGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(not|no|never|none|nobody|nothing|neither|nor|cannot|without)\b|n't\b")
        .expect("negation regex")
});

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "is", "are", "was", "were", "be", "been", "being",
    "to", "for", "and", "or", "if", "then", "else", "with", "by", "as", "from", "that", "this",
    "these", "those", "it", "its", "into", "over", "under", "not", "no", "but", "so", "do", "does",
    "did", "done", "have", "has", "had", "you", "your", "we", "our", "they", "their", "them", "he",
    "she", "his", "her", "who", "whom", "which", "what", "when", "where", "why", "how", "can",
    "will", "would", "there", "also", "about", "than", "i", "me", "my", "all", "any",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Lowercase, strip punctuation, collapse whitespace
///
/// ```
/// use verity_store::text::normalize;
///
/// assert_eq!(normalize("  What is the Capital of France?! "), "what is the capital of france");
/// ```
pub fn normalize(text: &str) -> String {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the word carries no content
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Light suffix stemming so that "founded"/"founds"/"founding" compare equal
pub fn stem(word: &str) -> String {
    let w = word.to_lowercase();
    let len = w.chars().count();

    if !w.is_ascii() || w.chars().all(|c| c.is_ascii_digit()) {
        return w;
    }
    if len > 4 && w.ends_with("ies") {
        return format!("{}y", &w[..w.len() - 3]);
    }
    if w.ends_with("sses") {
        return w[..w.len() - 2].to_string();
    }
    if len > 5 && w.ends_with("ing") {
        return w[..w.len() - 3].to_string();
    }
    if len > 4 && w.ends_with("ed") {
        return w[..w.len() - 2].to_string();
    }
    if len > 3 && w.ends_with('s') && !w.ends_with("ss") && !w.ends_with("us") && !w.ends_with("is") {
        return w[..w.len() - 1].to_string();
    }
    w
}

/// Stemmed content terms in text order, duplicates kept
///
/// Stop-words are removed, as are ASCII words of two characters or fewer
/// unless they are numbers. Non-ASCII runs are kept whole since scripts
/// written without spaces yield one run per phrase.
pub fn content_terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| !is_stopword(w))
        .filter(|w| w.len() > 2 || !w.is_ascii() || w.chars().all(|c| c.is_ascii_digit()))
        .map(stem)
        .collect()
}

/// Salient keywords: unique content terms in first-occurrence order
///
/// ```
/// use verity_store::text::keywords;
///
/// assert_eq!(keywords("Paris is the capital of France, and Paris is big"), vec!["paris", "capital", "france", "big"]);
/// ```
pub fn keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content_terms(text)
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Numbers mentioned in the text, separators removed
pub fn numbers(text: &str) -> BTreeSet<String> {
    NUMBER_RE
        .find_iter(text)
        .map(|m| m.as_str().replace(',', ""))
        .collect()
}

/// True when the text contains a negation cue
pub fn is_negated(text: &str) -> bool {
    NEGATION_RE.is_match(text)
}

/// First `max_chars` characters of the text, with an ellipsis when cut
pub fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Who founded SpaceX?"), "who founded spacex");
        assert_eq!(normalize("state-of-the-art, really!"), "state-of-the-art really");
        assert_eq!(normalize("?!"), "");
    }

    #[test]
    fn test_normalize_keeps_non_ascii_words() {
        assert_eq!(normalize("東京の人口は?"), "東京の人口は");
        assert_eq!(normalize("Où est Zürich ?"), "où est zürich");
        assert_ne!(normalize("東京の人口は?"), normalize("富士山の高さは?"));
    }

    #[test]
    fn test_stem_rules() {
        assert_eq!(stem("founded"), "found");
        assert_eq!(stem("landing"), "land");
        assert_eq!(stem("countries"), "country");
        assert_eq!(stem("classes"), "class");
        assert_eq!(stem("planets"), "planet");
        assert_eq!(stem("paris"), "paris");
        assert_eq!(stem("virus"), "virus");
        assert_eq!(stem("1969"), "1969");
    }

    #[test]
    fn test_content_terms_drop_stopwords() {
        assert_eq!(content_terms("What is the capital of France?"), vec!["capital", "france"]);
        assert_eq!(content_terms("Apollo 11 landed in 1969"), vec!["apollo", "11", "land", "1969"]);
        assert_eq!(content_terms("日本の首都は?"), vec!["日本の首都は"]);
        assert_eq!(content_terms("Él vive en Málaga"), vec!["él", "vive", "málaga"]);
    }

    #[test]
    fn test_keywords_are_unique() {
        assert_eq!(keywords("moon moon Moon"), vec!["moon"]);
        assert!(keywords("the of and").is_empty());
    }

    #[test]
    fn test_numbers() {
        let found = numbers("Founded in 2002 with 1,200 staff and 3.5 rockets");
        assert!(found.contains("2002"));
        assert!(found.contains("1200"));
        assert!(found.contains("3.5"));
        assert!(numbers("no digits here").is_empty());
    }

    #[test]
    fn test_negation() {
        assert!(is_negated("Paris is not the capital"));
        assert!(is_negated("It isn't true"));
        assert!(!is_negated("Paris is the capital"));
        assert!(!is_negated("Nothingness is a notion"));
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("short", 10), "short");
        assert_eq!(snippet("abcdefghij klm", 10), "abcdefghij...");
    }
}
