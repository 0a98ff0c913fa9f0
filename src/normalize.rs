//! Text normalization shared by lyric lines and transcript words.
//!
//! Both sides of the alignment go through the same functions, so a lyric token
//! and a transcript token compare equal exactly when they normalize to the same
//! string. Only ASCII letters and digits survive; everything else (punctuation,
//! accented letters, other scripts) becomes a word break.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Any character that is not an ASCII lowercase letter, digit or whitespace.
/// Applied after lowercasing, so uppercase ASCII never reaches it.
pub static NON_TOKEN_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Runs of whitespace (including a single tab or newline) collapse to one space.
pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// Normalize text for token comparison.
/// e.g., "Don't STOP—believin'!" → "don t stop believin"
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_TOKEN_CHAR.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Split text into normalized tokens.
/// Returns an empty vector (never `[""]`) when nothing survives normalization.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split(' ').map(str::to_string).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_basic() {
        assert_eq!(normalize_text("Hello, World!"), "hello world");
        assert_eq!(normalize_text("  spaced   out  "), "spaced out");
        assert_eq!(normalize_text("Don't"), "don t");
    }

    #[test]
    fn test_normalize_text_keeps_digits() {
        assert_eq!(normalize_text("Route 66"), "route 66");
        assert_eq!(normalize_text("99 Luftballons"), "99 luftballons");
    }

    #[test]
    fn test_normalize_text_whitespace_kinds() {
        assert_eq!(normalize_text("a\tb\r\nc"), "a b c");
    }

    #[test]
    fn test_normalize_text_non_ascii_becomes_space() {
        // Accented letters are not folded, they split the word
        assert_eq!(normalize_text("café"), "caf");
        assert_eq!(normalize_text("naïve"), "na ve");
        assert_eq!(normalize_text("кино"), "");
    }

    #[test]
    fn test_normalize_text_empty_and_punctuation_only() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("...!?"), "");
        assert_eq!(normalize_text("(  )"), "");
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("This is a TEST."), vec!["this", "is", "a", "test"]);
        assert_eq!(tokenize("rock'n'roll"), vec!["rock", "n", "roll"]);
    }

    #[test]
    fn test_tokenize_empty_is_empty_vec() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("—!!—").is_empty());
    }
}
