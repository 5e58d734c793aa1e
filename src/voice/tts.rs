//! Text-to-speech (TTS) processing
//!
//! Synthesis is the one best-effort step in the turn pipeline. The adapter
//! itself reports failures honestly; the turn engine decides to continue
//! without audio.

use async_trait::async_trait;

use crate::turn::Synthesizer;
use crate::{Error, Result};

/// Synthesizes speech from text via an OpenAI-compatible speech endpoint
pub struct TextToSpeech {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
        voice: String,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("API key required for TTS".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            voice,
        })
    }
}

#[async_trait]
impl Synthesizer for TextToSpeech {
    /// Synthesize text to speech, returning WAV bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            response_format: &'a str,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "wav",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("speech API error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
