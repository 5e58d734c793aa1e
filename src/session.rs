//! Session-scoped conversation state
//!
//! Each browser session owns two parallel, append-only sequences: the
//! model-facing history sent to the completion service (role + text only)
//! and the display history used for rendering (which may carry inline audio
//! markup). Both live in memory for the lifetime of the session and are
//! dropped with it; there is no durable storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker role for a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name of the role, as the completion service expects it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A model-facing turn: role and text only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a system turn
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A display turn: the rendering copy of a message, with optional inline
/// audio markup absent from the model-facing copy
#[derive(Debug, Clone)]
pub struct DisplayTurn {
    pub role: Role,
    pub content: String,
    pub audio: Option<String>,
}

/// One session's conversation state
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<ChatTurn>,
    display_history: Vec<DisplayTurn>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The model-facing history, oldest first.
    ///
    /// Never contains a system turn; the persona turn is rebuilt fresh for
    /// every completion request.
    #[must_use]
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The display history, oldest first
    #[must_use]
    pub fn display_history(&self) -> &[DisplayTurn] {
        &self.display_history
    }

    /// Append a user turn to both histories
    pub fn append_user(&mut self, content: &str, audio: Option<String>) {
        self.history.push(ChatTurn::user(content));
        self.display_history.push(DisplayTurn {
            role: Role::User,
            content: content.to_string(),
            audio,
        });
    }

    /// Append an assistant turn to both histories
    pub fn append_assistant(&mut self, content: &str, audio: Option<String>) {
        self.history.push(ChatTurn::assistant(content));
        self.display_history.push(DisplayTurn {
            role: Role::Assistant,
            content: content.to_string(),
            audio,
        });
    }

    /// Commit one full exchange: the user turn and its assistant reply are
    /// appended together, so a failed turn never leaves an orphaned user
    /// turn behind.
    pub fn commit_turn(&mut self, exchange: Exchange) {
        self.append_user(&exchange.user_text, exchange.user_audio);
        self.append_assistant(&exchange.reply_text, exchange.reply_audio);
    }
}

/// One completed user/assistant exchange, ready to commit
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user_text: String,
    pub user_audio: Option<String>,
    pub reply_text: String,
    pub reply_audio: Option<String>,
}

/// In-memory registry of active sessions, keyed by UUID
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its identifier
    pub fn create(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new());
        id
    }

    /// Look up a session by identifier
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Look up a session mutably by identifier
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Number of active sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
