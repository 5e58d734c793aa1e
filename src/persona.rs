//! Persona identity for the assistant
//!
//! The persona's system prompt is prepended to every completion request and
//! is never written into session history; callers rebuild it per request via
//! [`Persona::system_turn`].

use crate::session::ChatTurn;

/// The identity presented by the assistant
#[derive(Debug, Clone)]
pub struct Persona {
    /// Display name
    pub name: String,

    /// Fixed instruction-role prompt sent with every completion request
    pub system_prompt: String,

    /// Short descriptive phrase shown under the title
    pub tagline: String,
}

impl Persona {
    /// The default Void Whisper persona
    #[must_use]
    pub fn void_whisper() -> Self {
        Self {
            name: "Void Whisper".to_string(),
            system_prompt: "You are Void Whisper — calm, ancient, precise. \
                            Speak briefly. Never ramble. \
                            Your tone is thoughtful and restrained."
                .to_string(),
            tagline: "A calm intelligence from the void".to_string(),
        }
    }

    /// Build a fresh system turn for one completion request
    #[must_use]
    pub fn system_turn(&self) -> ChatTurn {
        ChatTurn::system(&self.system_prompt)
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::void_whisper()
    }
}
