//! Core data models for lyric alignment.
//!
//! Input and output shapes (`WordTimestamp`, `LyricLine`) mirror the JSON the
//! surrounding application exchanges, so they derive serde with the same field
//! names. The reporting types describe how each line was resolved.

use serde::{Deserialize, Serialize};

use crate::matcher::MAX_PREFIX_WORDS;

// ============================================================================
// Input / Output
// ============================================================================

/// One recognized word from a speech-to-text transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTimestamp {
    pub word: String,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds, expected >= start_time
}

impl WordTimestamp {
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
        }
    }
}

/// A lyric line with the playback time (seconds) it starts at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    pub timestamp: f64,
    pub text: String,
}

// ============================================================================
// Resolution
// ============================================================================

/// Which matcher rule located a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum MatchKind {
    /// The line's first `words` tokens appeared verbatim in the transcript
    Prefix { words: usize },
    /// Only one of the line's leading tokens was found
    Fallback,
}

/// How a single output line got its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "resolution")]
pub enum LineResolution {
    /// Timestamp taken from the transcript word at `word_index`
    /// (index into the caller's original transcript slice).
    Matched { word_index: usize, kind: MatchKind },
    /// Matching ran but found nothing; timestamp inferred from the previous line
    Unmatched,
    /// No transcript tokens or no line tokens, so matching never ran
    NoEvidence,
}

/// Aligned lines plus per-line diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlignmentReport {
    pub lines: Vec<LyricLine>,
    /// Parallel to `lines`.
    pub resolutions: Vec<LineResolution>,
    pub stats: AlignmentStats,
}

impl AlignmentReport {
    /// Write the full per-line report as JSON
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Counters describing one alignment run, or several merged together.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentStats {
    pub songs: usize,
    pub total_lines: usize,

    // Matched lines, bucketed by prefix length (index 0 = one word)
    pub prefix_matches_by_len: [usize; MAX_PREFIX_WORDS],
    pub fallback_matches: usize,

    // Inferred timestamps
    pub unmatched_lines: usize,
    pub no_evidence_lines: usize,

    // Transcript size before and after dropping words that normalize to nothing
    pub transcript_words: usize,
    pub usable_transcript_words: usize,
}

impl AlignmentStats {
    /// Record a resolved line.
    pub fn record(&mut self, resolution: &LineResolution) {
        self.total_lines += 1;
        match resolution {
            LineResolution::Matched {
                kind: MatchKind::Prefix { words },
                ..
            } => {
                // words is always in 1..=MAX_PREFIX_WORDS
                let bucket = words.saturating_sub(1).min(MAX_PREFIX_WORDS - 1);
                self.prefix_matches_by_len[bucket] += 1;
            }
            LineResolution::Matched {
                kind: MatchKind::Fallback,
                ..
            } => self.fallback_matches += 1,
            LineResolution::Unmatched => self.unmatched_lines += 1,
            LineResolution::NoEvidence => self.no_evidence_lines += 1,
        }
    }

    pub fn prefix_matches(&self) -> usize {
        self.prefix_matches_by_len.iter().sum()
    }

    pub fn matched_lines(&self) -> usize {
        self.prefix_matches() + self.fallback_matches
    }

    /// Percentage of lines whose timestamp came from the transcript
    pub fn match_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            100.0 * self.matched_lines() as f64 / self.total_lines as f64
        }
    }

    /// Fold another run's counters into this one.
    pub fn merge(&mut self, other: &AlignmentStats) {
        self.songs += other.songs;
        self.total_lines += other.total_lines;
        for (mine, theirs) in self
            .prefix_matches_by_len
            .iter_mut()
            .zip(other.prefix_matches_by_len.iter())
        {
            *mine += theirs;
        }
        self.fallback_matches += other.fallback_matches;
        self.unmatched_lines += other.unmatched_lines;
        self.no_evidence_lines += other.no_evidence_lines;
        self.transcript_words += other.transcript_words;
        self.usable_transcript_words += other.usable_transcript_words;
    }

    /// Log stats to stderr in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
