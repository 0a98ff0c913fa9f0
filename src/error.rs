//! Error types for transcript ingestion and transcription-client setup.
//!
//! Alignment itself has no error type: unmatched lines and empty inputs are
//! absorbed by the timestamp inference policy.

use thiserror::Error;

/// Invalid transcription-client configuration, reported at construction time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Required API key is missing or blank.
    #[error("{var} is not set; add it to the environment to enable transcription")]
    MissingApiKey { var: &'static str },

    /// Model name is blank.
    #[error("transcription model name must not be empty")]
    EmptyModel,

    /// Audio payload type the provider cannot transcribe.
    #[error("unsupported audio MIME type '{mime}' (expected audio/*)")]
    UnsupportedMimeType { mime: String },

    /// Settings could not be extracted from the environment.
    #[error("failed to load transcription settings: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Failure to turn a provider response into word timestamps.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// No direct JSON, fenced block or bracketed slice parsed.
    #[error("no JSON found in transcription response")]
    NoJson,

    /// JSON parsed but was not an array of words.
    #[error("transcription JSON is not an array")]
    NotAnArray,

    /// Array elements did not have the word/startTime/endTime shape.
    #[error("malformed transcript word: {0}")]
    Json(#[from] serde_json::Error),
}
