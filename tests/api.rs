//! API endpoint integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tokio::sync::Mutex;
use tower::ServiceExt;
use void_whisper::api::{chat, health, ApiState};
use void_whisper::SessionStore;

mod common;
use common::{engine, FixedTranscriber, ScriptedCompleter, WavSynthesizer};

const BOUNDARY: &str = "void-test-boundary";

/// Build a test router over scripted adapters
fn build_test_router() -> Router {
    let state = Arc::new(ApiState {
        sessions: Mutex::new(SessionStore::new()),
        engine: engine(
            FixedTranscriber("spoken words"),
            ScriptedCompleter::new("Greetings, traveler."),
            WavSynthesizer,
        ),
    });

    Router::new()
        .nest("/api/chat", chat::router(state))
        .merge(health::router())
}

/// Encode a multipart form body with optional text and audio parts
fn multipart_body(text: Option<&str>, audio: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(text) = text {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\n{text}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(audio) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; \
                 filename=\"audio.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a turn to a session and return (status, parsed JSON body)
async fn post_turn(
    app: Router,
    session_id: &str,
    text: Option<&str>,
    audio: Option<&[u8]>,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/chat/session/{session_id}/turn"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(text, audio)))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Create a session and return its id
async fn create_session(app: Router) -> String {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = build_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn text_turn_round_trip() {
    let app = build_test_router();
    let session_id = create_session(app.clone()).await;

    let (status, body) = post_turn(app.clone(), &session_id, Some("Hello"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let user_html = body["user_html"].as_str().unwrap();
    assert!(user_html.contains("turn user"));
    assert!(user_html.contains("Hello"));

    // The fresh reply carries the one-shot autoplay control
    let assistant_html = body["assistant_html"].as_str().unwrap();
    assert!(assistant_html.contains("turn assistant"));
    assert!(assistant_html.contains("Greetings, traveler."));
    assert!(assistant_html.contains("autoplay"));

    // Re-rendering the transcript yields passive controls only
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/chat/session/{session_id}/transcript"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let transcript = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(transcript.contains("Hello"));
    assert!(transcript.contains("Greetings, traveler."));
    assert!(!transcript.contains("autoplay"));
}

#[tokio::test]
async fn audio_turn_uses_the_transcript() {
    let app = build_test_router();
    let session_id = create_session(app.clone()).await;

    let (status, body) = post_turn(
        app,
        &session_id,
        Some("typed words"),
        Some(b"RIFFfakeclip"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let user_html = body["user_html"].as_str().unwrap();
    assert!(user_html.contains("spoken words"));
    assert!(!user_html.contains("typed words"));
    assert!(user_html.contains("data:audio/wav;base64,"));
}

#[tokio::test]
async fn empty_turn_is_idle() {
    let app = build_test_router();
    let session_id = create_session(app.clone()).await;

    let (status, body) = post_turn(app.clone(), &session_id, Some(""), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");

    // Nothing was committed
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/chat/session/{session_id}/transcript"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = build_test_router();

    let (status, body) = post_turn(
        app,
        "00000000-0000-0000-0000-000000000000",
        Some("Hello"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "session_not_found");
}
