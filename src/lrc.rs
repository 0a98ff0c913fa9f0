//! LRC export for aligned lyrics.
//!
//! Produces the common line-synced form: `[mm:ss.cc]text`, one line per lyric.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::LyricLine;

/// `mm:ss.cc` with rounded centiseconds. Minutes are not capped at 59.
/// Negative, NaN and infinite inputs clamp to zero.
pub fn format_timecode(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_centis = (seconds * 100.0).round() as i64;
    let minutes = total_centis / 6000;
    let secs = (total_centis / 100) % 60;
    let centis = total_centis % 100;
    format!("{:02}:{:02}.{:02}", minutes, secs, centis)
}

pub fn format_time_tag(seconds: f64) -> String {
    format!("[{}]", format_timecode(seconds))
}

/// Render lines as LRC text (newline terminated, empty for no lines).
pub fn to_lrc(lines: &[LyricLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&format_time_tag(line.timestamp));
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Write through a sibling temp file and rename into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Create {}", parent.display()))?;
    }
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    {
        let f = fs::File::create(&tmp).with_context(|| format!("Create {}", tmp.display()))?;
        let mut w = BufWriter::new(f);
        w.write_all(contents.as_bytes())?;
        w.flush()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("Rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
