//! Locating where a lyric line starts inside the transcript token stream.
//!
//! Search strategy, strongest evidence first:
//! 1. Exact match of the line's first `k` tokens, `k` from 5 down to 1
//! 2. Fallback: first transcript token equal to any of the line's first 3 tokens
//!
//! The caller's `search_from` cursor bounds every scan, so words consumed by
//! earlier lines are never reused.

use crate::models::MatchKind;

/// Longest line prefix tried for an exact match.
pub const MAX_PREFIX_WORDS: usize = 5;

/// Number of leading line tokens eligible for the single-word fallback.
pub const FALLBACK_CANDIDATE_WORDS: usize = 3;

/// Where a line was found and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch {
    /// Index into the transcript token sequence that was searched.
    pub index: usize,
    pub kind: MatchKind,
}

/// Find the transcript index where `line_tokens` most plausibly starts,
/// scanning no earlier than `search_from`.
pub fn find_start_index<S: AsRef<str>, T: AsRef<str>>(
    transcript_tokens: &[S],
    line_tokens: &[T],
    search_from: usize,
) -> Option<usize> {
    find_line_match(transcript_tokens, line_tokens, search_from).map(|m| m.index)
}

/// Same search as [`find_start_index`], also reporting which rule matched.
pub fn find_line_match<S: AsRef<str>, T: AsRef<str>>(
    transcript_tokens: &[S],
    line_tokens: &[T],
    search_from: usize,
) -> Option<LineMatch> {
    if line_tokens.is_empty() {
        return None;
    }

    for k in (1..=line_tokens.len().min(MAX_PREFIX_WORDS)).rev() {
        if let Some(index) = find_prefix(transcript_tokens, &line_tokens[..k], search_from) {
            return Some(LineMatch {
                index,
                kind: MatchKind::Prefix { words: k },
            });
        }
    }

    let candidates = &line_tokens[..line_tokens.len().min(FALLBACK_CANDIDATE_WORDS)];
    find_any_candidate(transcript_tokens, candidates, search_from).map(|index| LineMatch {
        index,
        kind: MatchKind::Fallback,
    })
}

/// Earliest `i >= search_from` where `transcript[i..i + prefix.len()]` equals `prefix`.
fn find_prefix<S: AsRef<str>, T: AsRef<str>>(
    transcript_tokens: &[S],
    prefix: &[T],
    search_from: usize,
) -> Option<usize> {
    let k = prefix.len();
    if k == 0 || transcript_tokens.len() < k {
        return None;
    }
    let last_start = transcript_tokens.len() - k;
    (search_from..=last_start).find(|&i| {
        transcript_tokens[i..i + k]
            .iter()
            .zip(prefix)
            .all(|(t, l)| {
                let t: &str = t.as_ref();
                t == l.as_ref()
            })
    })
}

/// First index `>= search_from` whose token is one of `candidates`.
/// Scan position decides ties, not candidate order.
fn find_any_candidate<S: AsRef<str>, T: AsRef<str>>(
    transcript_tokens: &[S],
    candidates: &[T],
    search_from: usize,
) -> Option<usize> {
    transcript_tokens
        .iter()
        .enumerate()
        .skip(search_from)
        .find(|&(_, token)| {
            let token: &str = token.as_ref();
            candidates.iter().any(|c| c.as_ref() == token)
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_empty_line_never_matches() {
        let transcript = toks("hello world");
        let line: Vec<String> = Vec::new();
        assert_eq!(find_start_index(&transcript, &line, 0), None);
    }

    #[test]
    fn test_exact_prefix_match() {
        let transcript = toks("hello world this is a test");
        assert_eq!(find_start_index(&transcript, &toks("this is a test"), 0), Some(2));
        assert_eq!(
            find_line_match(&transcript, &toks("this is a test"), 0).map(|m| m.kind),
            Some(MatchKind::Prefix { words: 4 })
        );
    }

    #[test]
    fn test_longer_prefix_beats_earlier_shorter_one() {
        // "la" alone occurs at 0, but "la di da" only occurs at 3
        let transcript = toks("la la la la di da");
        let found = find_line_match(&transcript, &toks("la di da"), 0).unwrap();
        assert_eq!(found.index, 3);
        assert_eq!(found.kind, MatchKind::Prefix { words: 3 });
    }

    #[test]
    fn test_prefix_capped_at_five_words() {
        let transcript = toks("one two three four five six seven");
        let line = toks("one two three four five eight nine");
        let found = find_line_match(&transcript, &line, 0).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.kind, MatchKind::Prefix { words: 5 });
    }

    #[test]
    fn test_shrinking_window() {
        // Line diverges from the transcript after two words
        let transcript = toks("x we will rock you");
        let found = find_line_match(&transcript, &toks("we will shake you"), 0).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.kind, MatchKind::Prefix { words: 2 });
    }

    #[test]
    fn test_earliest_occurrence_within_same_k() {
        let transcript = toks("go go go");
        assert_eq!(find_start_index(&transcript, &toks("go"), 0), Some(0));
        assert_eq!(find_start_index(&transcript, &toks("go"), 1), Some(1));
    }

    #[test]
    fn test_search_from_is_respected() {
        let transcript = toks("hello world hello world");
        assert_eq!(find_start_index(&transcript, &toks("hello world"), 1), Some(2));
        assert_eq!(find_start_index(&transcript, &toks("hello world"), 3), Some(3));
    }

    #[test]
    fn test_search_from_past_end() {
        let transcript = toks("hello world");
        assert_eq!(find_start_index(&transcript, &toks("hello"), 2), None);
        assert_eq!(find_start_index(&transcript, &toks("hello"), 10), None);
    }

    #[test]
    fn test_line_longer_than_transcript() {
        let transcript = toks("sing");
        let found = find_line_match(&transcript, &toks("sing it loud and clear now"), 0).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.kind, MatchKind::Prefix { words: 1 });
    }

    #[test]
    fn test_fallback_uses_scan_order_not_candidate_order() {
        // First line token "alpha" is absent, "gamma" appears before "beta"
        let transcript = toks("zzz gamma beta");
        let found = find_line_match(&transcript, &toks("alpha beta gamma"), 0).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.kind, MatchKind::Fallback);
    }

    #[test]
    fn test_fallback_only_considers_first_three_tokens() {
        let transcript = toks("zzz delta");
        assert_eq!(find_start_index(&transcript, &toks("alpha beta gamma delta"), 0), None);
    }

    #[test]
    fn test_no_match_at_all() {
        let transcript = toks("completely different words");
        assert_eq!(find_start_index(&transcript, &toks("unmatched phrase here"), 0), None);
    }

    #[test]
    fn test_accepts_str_slices() {
        let transcript = ["a", "b", "c"];
        let line = ["b", "c"];
        assert_eq!(find_start_index(&transcript, &line, 0), Some(1));
    }
}
