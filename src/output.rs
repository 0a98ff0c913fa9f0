//! Output formats shared by the command-line tools.

use anyhow::Result;
use clap::ValueEnum;

use crate::lrc::to_lrc;
use crate::models::LyricLine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty JSON array of {timestamp, text}
    Json,
    /// Line-synced LRC
    Lrc,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Lrc => "lrc",
        }
    }

    /// Output file name for a song stem. JSON gets a `.timed` infix so it
    /// never collides with the `<stem>.json` transcript next to it.
    pub fn file_name(self, stem: &str) -> String {
        match self {
            OutputFormat::Json => format!("{}.timed.json", stem),
            OutputFormat::Lrc => format!("{}.lrc", stem),
        }
    }

    pub fn render(self, lines: &[LyricLine]) -> Result<String> {
        match self {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(lines)?;
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Lrc => Ok(to_lrc(lines)),
        }
    }
}
