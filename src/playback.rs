//! Mapping a playback position to the lyric line being sung.

use crate::models::LyricLine;

/// Index of the line to highlight at `playback_time` seconds.
///
/// Walks lines in order and stops at the first one that starts after
/// `playback_time`, so a line with an out-of-order (earlier) timestamp after
/// that point is never selected. `None` before the first line starts.
pub fn active_line_index(lines: &[LyricLine], playback_time: f64) -> Option<usize> {
    lines
        .iter()
        .take_while(|line| playback_time >= line.timestamp)
        .count()
        .checked_sub(1)
}

/// The line to highlight at `playback_time`, if any.
pub fn active_line(lines: &[LyricLine], playback_time: f64) -> Option<&LyricLine> {
    active_line_index(lines, playback_time).map(|i| &lines[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(timestamps: &[f64]) -> Vec<LyricLine> {
        timestamps
            .iter()
            .enumerate()
            .map(|(i, &timestamp)| LyricLine {
                timestamp,
                text: format!("line {}", i),
            })
            .collect()
    }

    #[test]
    fn test_before_first_line() {
        assert_eq!(active_line_index(&lines(&[1.0, 2.0]), 0.5), None);
        assert_eq!(active_line_index(&[], 10.0), None);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let l = lines(&[0.0, 1.2, 3.0]);
        assert_eq!(active_line_index(&l, 0.0), Some(0));
        assert_eq!(active_line_index(&l, 1.19), Some(0));
        assert_eq!(active_line_index(&l, 1.2), Some(1));
        assert_eq!(active_line_index(&l, 99.0), Some(2));
    }

    #[test]
    fn test_stops_at_first_later_line() {
        // Third line's timestamp went backwards; scanning stops at the second
        let l = lines(&[1.0, 5.0, 2.0]);
        assert_eq!(active_line_index(&l, 3.0), Some(0));
        assert_eq!(active_line_index(&l, 6.0), Some(2));
    }

    #[test]
    fn test_equal_timestamps_pick_last() {
        let l = lines(&[1.0, 1.0, 4.0]);
        assert_eq!(active_line(&l, 1.5).map(|x| x.text.as_str()), Some("line 1"));
    }
}
