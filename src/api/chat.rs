//! Chat endpoints: session creation, turn processing, transcript re-render

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::ApiState;
use crate::render;
use crate::turn::TurnInput;

/// Clip uploads are capped at the transcription service's file size limit.
const MAX_TURN_BODY: usize = 25 * 1024 * 1024;

/// Build the chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/session", post(create_session))
        .route("/session/{id}/turn", post(turn))
        .route("/session/{id}/transcript", get(transcript))
        .layer(DefaultBodyLimit::max(MAX_TURN_BODY))
        .with_state(state)
}

/// Session creation response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

/// Create a new chat session
async fn create_session(State(state): State<Arc<ApiState>>) -> Json<SessionResponse> {
    let session_id = state.sessions.lock().await.create();
    tracing::info!(%session_id, "session created");
    Json(SessionResponse { session_id })
}

/// Turn processing response
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnResponse {
    /// No usable input this cycle; nothing changed
    Idle,
    /// A full exchange was committed
    Completed {
        user_html: String,
        assistant_html: String,
    },
}

/// Process one turn for a session
///
/// Accepts a multipart form with an optional `text` field and an optional
/// `audio` file part (WAV). Audio takes precedence when both are present.
async fn turn(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<TurnResponse>, ChatError> {
    let mut input = TurnInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ChatError::BadRequest("malformed multipart body"))?
    {
        match field.name() {
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ChatError::BadRequest("text field is not valid UTF-8"))?;
                input.text = Some(text);
            }
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ChatError::BadRequest("audio field could not be read"))?;
                input.audio = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    // The store lock stays held across the whole turn; see `ApiState`.
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(id).ok_or(ChatError::SessionNotFound)?;

    let outcome = state
        .engine
        .run_turn(session, input)
        .await
        .map_err(ChatError::Turn)?;

    let response = match outcome {
        None => TurnResponse::Idle,
        Some(completed) => TurnResponse::Completed {
            user_html: render::render_turn(&completed.user),
            assistant_html: render::render_turn_with_audio(
                &completed.assistant,
                completed.autoplay_audio.as_deref(),
            ),
        },
    };

    Ok(Json(response))
}

/// Re-render the full transcript for a session (all playback controls passive)
async fn transcript(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ChatError> {
    let sessions = state.sessions.lock().await;
    let session = sessions.get(id).ok_or(ChatError::SessionNotFound)?;
    Ok(Html(render::render_transcript(session.display_history())))
}

/// Chat API errors
#[derive(Debug)]
pub enum ChatError {
    SessionNotFound,
    BadRequest(&'static str),
    Turn(crate::Error),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "unknown session".to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::Turn(err) => {
                let code = match &err {
                    crate::Error::Stt(_) => "transcription_failed",
                    crate::Error::Completion(_) => "completion_failed",
                    _ => "turn_failed",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
