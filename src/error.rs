//! Error types for the Void Whisper gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad env value)
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Chat completion error
    #[error("completion error: {0}")]
    Completion(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
