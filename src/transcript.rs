//! Reading word timestamps out of speech-to-text responses.
//!
//! Transcription models often wrap their JSON in prose or Markdown fences, so
//! extraction tries progressively looser candidates until one parses:
//! 1. The whole response
//! 2. A ```json fenced block, then any ``` fenced block
//! 3. The widest `[...]` slice, then the widest `{...}` slice

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::TranscriptError;
use crate::models::WordTimestamp;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// ```json ... ``` (language tag case-insensitive)
pub static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").unwrap());

/// ``` ... ``` with or without a language tag
pub static ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap());

// ============================================================================
// EXTRACTION
// ============================================================================

/// Find the first JSON value embedded in a model response.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    for pattern in [&*JSON_FENCE, &*ANY_FENCE] {
        let fenced = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|body| !body.is_empty());
        if let Some(value) = fenced.and_then(|body| serde_json::from_str::<Value>(body).ok()) {
            return Some(value);
        }
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(value) = widest_slice(text, open, close).and_then(|s| serde_json::from_str::<Value>(s).ok()) {
            return Some(value);
        }
    }

    None
}

/// Text from the first `open` to the last `close`, inclusive.
fn widest_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse word timestamps from a model response.
pub fn extract_words(text: &str) -> Result<Vec<WordTimestamp>, TranscriptError> {
    let value = extract_json(text).ok_or(TranscriptError::NoJson)?;
    if !value.is_array() {
        return Err(TranscriptError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

/// Lenient variant of [`extract_words`]: anything unusable becomes an empty
/// transcript, which alignment treats as "no evidence".
pub fn words_from_response(text: &str) -> Vec<WordTimestamp> {
    match extract_words(text) {
        Ok(words) => words,
        Err(e) => {
            warn!(error = %e, "discarding unusable transcription response");
            Vec::new()
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// A transcript word that breaks the provider's timing contract.
/// Alignment tolerates all of these; they are reported for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptIssue {
    NonFiniteTime { index: usize },
    NegativeStart { index: usize, start: f64 },
    EndBeforeStart { index: usize, start: f64, end: f64 },
    OutOfOrder { index: usize, start: f64, previous_start: f64 },
}

impl fmt::Display for TranscriptIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptIssue::NonFiniteTime { index } => {
                write!(f, "word {}: non-finite start or end time", index)
            }
            TranscriptIssue::NegativeStart { index, start } => {
                write!(f, "word {}: negative start time {}", index, start)
            }
            TranscriptIssue::EndBeforeStart { index, start, end } => {
                write!(f, "word {}: end time {} before start time {}", index, end, start)
            }
            TranscriptIssue::OutOfOrder {
                index,
                start,
                previous_start,
            } => write!(
                f,
                "word {}: start time {} earlier than previous word's {}",
                index, start, previous_start
            ),
        }
    }
}

/// Check words against the expected shape: finite, non-negative,
/// `end >= start`, and chronologically ordered by start time.
pub fn validate(words: &[WordTimestamp]) -> Vec<TranscriptIssue> {
    let mut issues = Vec::new();
    let mut previous_start: Option<f64> = None;

    for (index, word) in words.iter().enumerate() {
        let (start, end) = (word.start_time, word.end_time);
        if !start.is_finite() || !end.is_finite() {
            issues.push(TranscriptIssue::NonFiniteTime { index });
            continue;
        }
        if start < 0.0 {
            issues.push(TranscriptIssue::NegativeStart { index, start });
        }
        if end < start {
            issues.push(TranscriptIssue::EndBeforeStart { index, start, end });
        }
        if let Some(previous_start) = previous_start {
            if start < previous_start {
                issues.push(TranscriptIssue::OutOfOrder {
                    index,
                    start,
                    previous_start,
                });
            }
        }
        previous_start = Some(start);
    }

    for issue in &issues {
        warn!(%issue, "transcript contract violation");
    }
    issues
}
