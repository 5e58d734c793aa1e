//! The turn engine: capture → transcription → completion → synthesis
//!
//! One user turn runs start to finish before the next is accepted. The three
//! service calls are strictly sequential because each depends on the
//! previous one's output. Transcription and completion failures abort the
//! turn with no history mutation; synthesis is the one best-effort step and
//! a failure there only costs the spoken reply.

use std::sync::Arc;

use async_trait::async_trait;

use crate::persona::Persona;
use crate::render;
use crate::session::{ChatTurn, DisplayTurn, Exchange, Session};
use crate::Result;

/// Converts captured audio into text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio bytes to plain text
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Produces one reply for an ordered turn sequence
#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete the conversation; `turns` already includes the persona
    /// system turn first and the new user turn last
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

/// Converts reply text into an audio byte stream
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize speech for the given text
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// The input captured for one interaction cycle
///
/// At most one channel becomes the active input: non-empty audio is
/// authoritative and overrides any typed text in the same cycle.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Typed text, if any
    pub text: Option<String>,

    /// Captured audio clip, if any
    pub audio: Option<Vec<u8>>,
}

impl TurnInput {
    /// Input from typed text only
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            audio: None,
        }
    }

    /// Input from a captured audio clip only
    #[must_use]
    pub const fn audio(audio: Vec<u8>) -> Self {
        Self {
            text: None,
            audio: Some(audio),
        }
    }
}

/// A successfully processed turn, ready for presentation
#[derive(Debug, Clone)]
pub struct CompletedTurn {
    /// The committed user display turn
    pub user: DisplayTurn,

    /// The committed assistant display turn (passive audio markup)
    pub assistant: DisplayTurn,

    /// Autoplay variant of the assistant audio markup, rendered exactly once
    /// for the fresh reply; re-renders use the passive copy in `assistant`
    pub autoplay_audio: Option<String>,
}

/// Orchestrates one conversation turn across the three service adapters
pub struct TurnEngine {
    transcriber: Arc<dyn Transcriber>,
    completer: Arc<dyn Completer>,
    synthesizer: Arc<dyn Synthesizer>,
    persona: Persona,
}

impl TurnEngine {
    /// Create a new engine over the given adapters
    #[must_use]
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        completer: Arc<dyn Completer>,
        synthesizer: Arc<dyn Synthesizer>,
        persona: Persona,
    ) -> Self {
        Self {
            transcriber,
            completer,
            synthesizer,
            persona,
        }
    }

    /// The active persona
    #[must_use]
    pub const fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Process one turn against the given session.
    ///
    /// Returns `Ok(None)` when there is no usable input (the empty-input
    /// no-op: no history mutation, no service call beyond transcription of
    /// an audio clip that turned out silent).
    ///
    /// # Errors
    ///
    /// Returns `Error::Stt` or `Error::Completion` if the critical-path
    /// services fail; the session is left untouched in that case. Synthesis
    /// failures are absorbed and the turn completes without audio.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        input: TurnInput,
    ) -> Result<Option<CompletedTurn>> {
        let Some(captured) = self.resolve_input(input).await? else {
            tracing::debug!("no input captured, skipping turn");
            return Ok(None);
        };

        // Persona first, stored history next, the new user turn last. The
        // user turn is staged here and only committed once the completion
        // succeeds, so a failed call leaves no orphaned user turn.
        let mut turns = Vec::with_capacity(session.history().len() + 2);
        turns.push(self.persona.system_turn());
        turns.extend_from_slice(session.history());
        turns.push(ChatTurn::user(&captured.text));

        let reply = self.completer.complete(&turns).await?;
        tracing::info!(chars = reply.len(), "completion received");

        // The one deliberate failure-isolation point: a spoken reply is an
        // enhancement, not part of the critical path.
        let reply_wav = match self.synthesizer.synthesize(&reply).await {
            Ok(wav) => Some(wav),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis failed, continuing without audio");
                None
            }
        };

        let user_audio = captured
            .audio
            .as_deref()
            .map(|wav| render::audio_element(wav, false));
        let reply_audio = reply_wav
            .as_deref()
            .map(|wav| render::audio_element(wav, false));
        let autoplay_audio = reply_wav
            .as_deref()
            .map(|wav| render::audio_element(wav, true));

        session.commit_turn(Exchange {
            user_text: captured.text,
            user_audio,
            reply_text: reply,
            reply_audio,
        });

        let history = session.display_history();
        let user = history[history.len() - 2].clone();
        let assistant = history[history.len() - 1].clone();

        Ok(Some(CompletedTurn {
            user,
            assistant,
            autoplay_audio,
        }))
    }

    /// Resolve the active input channel for this cycle.
    ///
    /// Non-empty audio wins over typed text; an audio clip is transcribed
    /// before the guard so a silent clip still counts as empty input.
    async fn resolve_input(&self, input: TurnInput) -> Result<Option<CapturedInput>> {
        if let Some(audio) = input.audio.filter(|a| !a.is_empty()) {
            let transcript = self.transcriber.transcribe(&audio).await?;
            tracing::info!(transcript = %transcript, "audio input transcribed");
            if transcript.trim().is_empty() {
                return Ok(None);
            }
            return Ok(Some(CapturedInput {
                text: transcript,
                audio: Some(audio),
            }));
        }

        let text = input.text.unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(CapturedInput { text, audio: None }))
    }
}

/// The resolved input for one turn: text, plus the source clip when spoken
struct CapturedInput {
    text: String,
    audio: Option<Vec<u8>>,
}
