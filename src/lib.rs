//! Lyric-to-audio line alignment - shared modules for all binaries.
//!
//! [`align::align`] assigns each lyric line the start time of the transcript
//! word where that line begins. The remaining modules handle the edges:
//! reading transcripts, configuring the transcription provider, exporting LRC
//! and finding the active line during playback.

pub mod align;
pub mod config;
pub mod error;
pub mod lrc;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod output;
pub mod playback;
pub mod progress;
pub mod safety;
pub mod transcribe;
pub mod transcript;

pub use align::{align, align_with_report};
pub use error::{ConfigurationError, TranscriptError};
pub use models::{AlignmentReport, AlignmentStats, LineResolution, LyricLine, MatchKind, WordTimestamp};
