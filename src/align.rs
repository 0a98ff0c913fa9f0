//! Line-level lyric alignment against a word-timed transcript.
//!
//! Lines are resolved strictly in input order. A forward-only cursor over the
//! transcript tokens means a line can never resolve to a word at or before the
//! word used by an earlier line. Lines without transcript evidence are placed
//! one second after the previous line.

use tracing::debug;

use crate::matcher::find_line_match;
use crate::models::{AlignmentReport, AlignmentStats, LineResolution, LyricLine, WordTimestamp};
use crate::normalize::{normalize_text, tokenize};

/// Gap in seconds assigned to a line whose timestamp has to be inferred.
pub const INFERRED_LINE_GAP_SECS: f64 = 1.0;

/// Transcript tokens that survived normalization, each with the index of the
/// word it came from.
struct TranscriptTokens {
    tokens: Vec<String>,
    source_index: Vec<usize>,
}

impl TranscriptTokens {
    fn build(words: &[WordTimestamp]) -> Self {
        let mut tokens = Vec::with_capacity(words.len());
        let mut source_index = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let normalized = normalize_text(&word.word);
            if !normalized.is_empty() {
                tokens.push(normalized);
                source_index.push(i);
            }
        }
        Self {
            tokens,
            source_index,
        }
    }
}

/// Split raw lyric text into trimmed, non-empty lines.
///
/// U+FEFF counts as whitespace here so a byte-order mark never survives into
/// line text or becomes a line of its own.
pub fn split_lyric_lines(raw_lyrics: &str) -> Vec<&str> {
    raw_lyrics
        .split('\n')
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}'))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Align lyric lines to transcript word timings.
///
/// Returns one [`LyricLine`] per non-empty input line, in input order. Never
/// fails: lines without a match get the previous timestamp plus one second.
pub fn align(raw_lyrics: &str, transcript_words: &[WordTimestamp]) -> Vec<LyricLine> {
    align_with_report(raw_lyrics, transcript_words).lines
}

/// Same as [`align`], also returning how every line was resolved.
pub fn align_with_report(raw_lyrics: &str, transcript_words: &[WordTimestamp]) -> AlignmentReport {
    let lines = split_lyric_lines(raw_lyrics);
    if lines.is_empty() {
        return AlignmentReport::default();
    }

    let transcript = TranscriptTokens::build(transcript_words);
    let mut stats = AlignmentStats {
        songs: 1,
        transcript_words: transcript_words.len(),
        usable_transcript_words: transcript.tokens.len(),
        ..Default::default()
    };

    let mut aligned = Vec::with_capacity(lines.len());
    let mut resolutions = Vec::with_capacity(lines.len());
    let mut search_cursor = 0usize;
    let mut last_timestamp = 0.0f64;

    for (line_no, line) in lines.into_iter().enumerate() {
        let line_tokens = tokenize(line);

        let (timestamp, resolution) = if !transcript.tokens.is_empty() && !line_tokens.is_empty() {
            match find_line_match(&transcript.tokens, &line_tokens, search_cursor) {
                Some(found) => {
                    let word_index = transcript.source_index[found.index];
                    search_cursor = found.index + 1;
                    (
                        transcript_words[word_index].start_time,
                        LineResolution::Matched {
                            word_index,
                            kind: found.kind,
                        },
                    )
                }
                // max() keeps the gap non-negative even if last_timestamp is degenerate
                None => (
                    (last_timestamp + INFERRED_LINE_GAP_SECS).max(last_timestamp),
                    LineResolution::Unmatched,
                ),
            }
        } else {
            (
                last_timestamp + INFERRED_LINE_GAP_SECS,
                LineResolution::NoEvidence,
            )
        };

        debug!(line = line_no, timestamp, ?resolution, text = line, "aligned line");

        stats.record(&resolution);
        resolutions.push(resolution);
        aligned.push(LyricLine {
            timestamp,
            text: line.to_string(),
        });
        last_timestamp = timestamp;
    }

    debug!(
        lines = stats.total_lines,
        matched = stats.matched_lines(),
        unmatched = stats.unmatched_lines,
        no_evidence = stats.no_evidence_lines,
        "alignment finished"
    );

    AlignmentReport {
        lines: aligned,
        resolutions,
        stats,
    }
}
