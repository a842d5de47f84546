//! Speech synthesis client.
//!
//! The TTS collaborator is an HTTP service taking `{text, voice}` and
//! returning MPEG audio bytes. It sits behind the `SpeechSynthesizer` trait
//! so the orchestrator can be tested with a double, and so a synthesis
//! failure stays independent of the chat turn that produced the text.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// HTTP client for the configured text-to-speech endpoint.
#[derive(Clone)]
pub struct HttpSpeechClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    voice: String,
}

impl HttpSpeechClient {
    pub fn new(endpoint: String, api_key: Option<String>, voice: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            api_key,
            voice,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        let mut request = self.client.post(&self.endpoint).json(&SynthesisRequest {
            text,
            voice: &self.voice,
        });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?;
        debug!("Synthesized {} bytes of audio", audio.len());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_request_shape() {
        let request = SynthesisRequest {
            text: "Hello there",
            voice: "en-US-female",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "Hello there");
        assert_eq!(json["voice"], "en-US-female");
    }
}
