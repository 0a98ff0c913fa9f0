//! Request building and response parsing for the speech-to-text provider.
//!
//! Sending the request is left to the caller; this type only owns the
//! validated configuration and the provider-specific payload shapes.

use serde_json::{json, Value};

use crate::config::TranscriptionConfig;
use crate::error::ConfigurationError;
use crate::models::WordTimestamp;
use crate::transcript::words_from_response;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Instruction sent alongside the audio. Asks for exactly the shape
/// [`WordTimestamp`] deserializes from.
pub const TRANSCRIPTION_PROMPT: &str = "Transcribe the attached audio word by word. \
Respond with a JSON array only, one object per spoken word, each with \
'word' (string), 'startTime' (number, seconds) and 'endTime' (number, seconds). \
Use floating-point seconds with as much precision as you can. \
If nothing can be transcribed or timed, respond with an empty array.";

#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    config: TranscriptionConfig,
}

impl TranscriptionClient {
    /// Validate the configuration and build a client.
    pub fn new(config: TranscriptionConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Shorthand for `TranscriptionClient::new(TranscriptionConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::new(TranscriptionConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.config.model)
    }

    /// JSON body carrying the prompt and the audio inline as base64.
    pub fn request_body(&self, audio: &[u8], mime_type: &str) -> Result<Value, ConfigurationError> {
        if !mime_type.starts_with("audio/") {
            return Err(ConfigurationError::UnsupportedMimeType {
                mime: mime_type.to_string(),
            });
        }
        Ok(json!({
            "contents": [{
                "parts": [
                    { "text": TRANSCRIPTION_PROMPT },
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": base64::encode(audio),
                        }
                    }
                ]
            }]
        }))
    }

    /// Word timings from the model's text reply; empty when unusable.
    pub fn parse_response(&self, text: &str) -> Vec<WordTimestamp> {
        words_from_response(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TranscriptionClient {
        TranscriptionClient::new(TranscriptionConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_new_rejects_missing_key() {
        let err = TranscriptionClient::new(TranscriptionConfig::new("")).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingApiKey { .. }));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let c = TranscriptionClient::new(TranscriptionConfig::new("k").with_model("gemini-2.0-flash")).unwrap();
        assert_eq!(
            c.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(c.model(), "gemini-2.0-flash");
        assert_eq!(c.api_key(), "k");
    }

    #[test]
    fn test_request_body_inlines_audio() {
        let body = client().request_body(b"abc", "audio/mpeg").unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], TRANSCRIPTION_PROMPT);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "audio/mpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "YWJj");
    }

    #[test]
    fn test_request_body_rejects_non_audio() {
        let err = client().request_body(b"abc", "image/png").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedMimeType { mime } if mime == "image/png"));
    }

    #[test]
    fn test_parse_response_feeds_alignment() {
        let reply = "```json\n[{\"word\":\"Hello\",\"startTime\":0.25,\"endTime\":0.5}]\n```";
        let words = client().parse_response(reply);
        let lines = crate::align::align("Hello!", &words);
        assert_eq!(lines[0].timestamp, 0.25);
        assert!(client().parse_response("no idea").is_empty());
    }
}
