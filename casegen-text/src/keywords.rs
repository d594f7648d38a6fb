//! Keyword extraction
//!
//! Lowercases, strips punctuation, drops stop words and short tokens, and
//! de-duplicates while keeping first-seen order.

/// Words never considered keywords
pub const STOP_WORDS: &[&str] = &[
    "a", "able", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "being", "but", "by", "can", "could", "does", "each", "every", "for",
    "from", "given", "has", "have", "into", "is", "it", "its", "must", "not", "of", "on",
    "only", "onto", "or", "shall", "should", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "to", "upon", "was", "were",
    "what", "when", "where", "which", "while", "who", "will", "with", "within", "without",
    "would",
];

/// Tokens of this many characters or fewer are dropped
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Extracts keywords from `text` in first-seen order
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if token.chars().count() <= MIN_KEYWORD_CHARS || STOP_WORDS.contains(&token) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}
