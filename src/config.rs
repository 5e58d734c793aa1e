//! Runtime configuration
//!
//! All configuration comes from the process environment at startup. The one
//! required value is the `GROQ_API_KEY` credential; its absence is a fatal
//! startup error, surfaced before the gateway accepts any input. Everything
//! else has defaults matching the hosted models the gateway was built
//! against and can be overridden per deployment.

use secrecy::SecretString;

use crate::{Error, Result};

/// Default OpenAI-compatible API base
const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential (from `GROQ_API_KEY`)
    pub api_key: SecretString,

    /// OpenAI-compatible API base URL (from `GROQ_API_BASE`)
    pub api_base: String,

    /// Transcription settings
    pub stt: SttConfig,

    /// Chat completion settings
    pub llm: LlmConfig,

    /// Speech synthesis settings
    pub tts: TtsConfig,
}

/// Speech-to-text configuration
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// Transcription model (from `VOID_STT_MODEL`)
    pub model: String,
}

/// Chat completion configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Completion model (from `VOID_LLM_MODEL`)
    pub model: String,

    /// Sampling temperature (from `VOID_LLM_TEMPERATURE`)
    pub temperature: f32,

    /// Maximum generated tokens per reply (from `VOID_LLM_MAX_TOKENS`)
    pub max_tokens: u32,
}

/// Text-to-speech configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Synthesis model (from `VOID_TTS_MODEL`)
    pub model: String,

    /// Voice identity (from `VOID_TTS_VOICE`)
    pub voice: String,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `GROQ_API_KEY` is unset or a numeric
    /// override fails to parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Tests use this to avoid mutating process-wide environment state.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("GROQ_API_KEY is not set".to_string()))?;

        let temperature = parse_override(&lookup, "VOID_LLM_TEMPERATURE", 0.65)?;
        let max_tokens = parse_override(&lookup, "VOID_LLM_MAX_TOKENS", 400)?;

        Ok(Self {
            api_key: api_key.into(),
            api_base: lookup("GROQ_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            stt: SttConfig {
                model: lookup("VOID_STT_MODEL")
                    .unwrap_or_else(|| "whisper-large-v3-turbo".to_string()),
            },
            llm: LlmConfig {
                model: lookup("VOID_LLM_MODEL")
                    .unwrap_or_else(|| "llama-3.3-70b-versatile".to_string()),
                temperature,
                max_tokens,
            },
            tts: TtsConfig {
                model: lookup("VOID_TTS_MODEL")
                    .unwrap_or_else(|| "canopylabs/orpheus-v1-english".to_string()),
                voice: lookup("VOID_TTS_VOICE").unwrap_or_else(|| "hannah".to_string()),
            },
        })
    }
}

/// Parse an optional numeric override, falling back to the default
fn parse_override<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| Error::Config(format!("invalid value for {key}: {raw}")))
    })
}
