//! Void Whisper - voice and text chat gateway with spoken replies
//!
//! The gateway turns one user message (typed or spoken) into one assistant
//! reply (text plus best-effort speech) and renders both into a scrolling
//! transcript. The hard boundary is three opaque HTTP collaborators:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 Chat page (browser)               │
//! │      transcript  │  text input  │  mic capture    │
//! └────────────────────────┬─────────────────────────┘
//!                          │
//! ┌────────────────────────▼─────────────────────────┐
//! │              Void Whisper gateway                 │
//! │   Session store  │  Turn engine  │  Rendering     │
//! └────────────────────────┬─────────────────────────┘
//!                          │
//! ┌────────────────────────▼─────────────────────────┐
//! │        Hosted models (OpenAI-compatible API)      │
//! │   transcription  │  completion  │  synthesis      │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Per turn: capture → transcription (audio only) → completion (persona
//! system turn prepended fresh, never stored) → transactional history
//! commit → best-effort synthesis → render. Transcription and completion
//! failures abort the turn untouched; synthesis failures only cost the
//! spoken reply.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod render;
pub mod session;
pub mod turn;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use llm::ChatCompletions;
pub use persona::Persona;
pub use session::{ChatTurn, DisplayTurn, Exchange, Role, Session, SessionStore};
pub use turn::{Completer, CompletedTurn, Synthesizer, Transcriber, TurnEngine, TurnInput};
pub use voice::{SpeechToText, TextToSpeech};
