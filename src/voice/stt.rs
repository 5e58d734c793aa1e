//! Speech-to-text (STT) processing
//!
//! Transcription sits on the critical path of a turn: any failure here
//! aborts the turn and propagates to the caller.

use std::io::Write;

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::turn::Transcriber;
use crate::{Error, Result};

/// Transcribes speech to text via an OpenAI-compatible Whisper endpoint
pub struct SpeechToText {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("API key required for STT".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Transcriber for SpeechToText {
    /// Transcribe audio to text
    ///
    /// The captured bytes are spooled through a scoped temporary file that
    /// is removed on every exit path, then submitted as a multipart upload
    /// with `response_format=text`. Returns the trimmed transcript.
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let spool = spool_to_temp(audio)?;
        let upload = tokio::fs::read(spool.path()).await?;

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(upload)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("response_format", "text");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!("transcription error {status}: {body}")));
        }

        // response_format=text returns the bare transcript, not JSON
        let transcript = response.text().await?.trim().to_string();

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

/// Write captured audio to a scoped temporary file.
///
/// The file is removed when the returned handle drops, whether the
/// transcription call succeeds or fails.
fn spool_to_temp(audio: &[u8]) -> Result<NamedTempFile> {
    let mut spool = NamedTempFile::with_suffix(".wav")?;
    spool.write_all(audio)?;
    spool.flush()?;
    Ok(spool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = SpeechToText::new(
            reqwest::Client::new(),
            "http://localhost".to_string(),
            String::new(),
            "whisper-large-v3-turbo".to_string(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn spool_holds_bytes_while_alive() {
        let spool = spool_to_temp(b"RIFFfakewav").unwrap();
        let on_disk = std::fs::read(spool.path()).unwrap();
        assert_eq!(on_disk, b"RIFFfakewav");
    }

    #[test]
    fn spool_is_removed_on_drop() {
        let spool = spool_to_temp(b"RIFFfakewav").unwrap();
        let path = spool.path().to_path_buf();
        assert!(path.exists());

        drop(spool);
        assert!(!path.exists());
    }
}
