//! Shared test utilities: scripted adapters for exercising the turn engine
//! without network access

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use void_whisper::{
    ChatTurn, Completer, Error, Persona, Result, Synthesizer, Transcriber, TurnEngine,
};

/// Transcriber returning a fixed transcript for any clip
pub struct FixedTranscriber(pub &'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Transcriber that always fails
pub struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        Err(Error::Stt("induced transcription failure".to_string()))
    }
}

/// Completer returning a fixed reply and recording every request it sees
pub struct ScriptedCompleter {
    pub reply: &'static str,
    pub seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl ScriptedCompleter {
    pub fn new(reply: &'static str) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        self.seen.lock().unwrap().push(turns.to_vec());
        Ok(self.reply.to_string())
    }
}

/// Completer that always fails
pub struct FailingCompleter;

#[async_trait]
impl Completer for FailingCompleter {
    async fn complete(&self, _turns: &[ChatTurn]) -> Result<String> {
        Err(Error::Completion("induced completion failure".to_string()))
    }
}

/// Synthesizer returning a small fake WAV payload
pub struct WavSynthesizer;

#[async_trait]
impl Synthesizer for WavSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Ok(b"RIFFfakewav".to_vec())
    }
}

/// Synthesizer that always fails
pub struct FailingSynthesizer;

#[async_trait]
impl Synthesizer for FailingSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Err(Error::Tts("induced synthesis failure".to_string()))
    }
}

/// Build an engine over the given adapters with the default persona
pub fn engine(
    transcriber: impl Transcriber + 'static,
    completer: impl Completer + 'static,
    synthesizer: impl Synthesizer + 'static,
) -> TurnEngine {
    TurnEngine::new(
        Arc::new(transcriber),
        Arc::new(completer),
        Arc::new(synthesizer),
        Persona::void_whisper(),
    )
}

/// Engine plus a handle onto the completer's recorded requests
pub fn engine_with_recorder(
    transcriber: impl Transcriber + 'static,
    reply: &'static str,
    synthesizer: impl Synthesizer + 'static,
) -> (TurnEngine, Arc<ScriptedCompleter>) {
    let completer = Arc::new(ScriptedCompleter::new(reply));
    let engine = TurnEngine::new(
        Arc::new(transcriber),
        completer.clone(),
        Arc::new(synthesizer),
        Persona::void_whisper(),
    );
    (engine, completer)
}
