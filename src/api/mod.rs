//! HTTP surface for the gateway
//!
//! One page, one health probe, and the chat endpoints. The transcript page
//! is embedded in the binary; audio travels inline in rendered fragments,
//! so there is no asset storage to serve.

pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::{response::Html, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::session::SessionStore;
use crate::turn::TurnEngine;
use crate::Result;

/// The chat page served at `/`
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared state for API handlers
pub struct ApiState {
    /// Active sessions. The store lock is held for the whole of a turn, so
    /// turn processing is strictly serial: capture through render finishes
    /// before the next turn starts.
    pub sessions: Mutex<SessionStore>,

    /// The turn engine driving the three service adapters
    pub engine: TurnEngine,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server over the given engine
    #[must_use]
    pub fn new(engine: TurnEngine, port: u16) -> Self {
        Self {
            state: Arc::new(ApiState {
                sessions: Mutex::new(SessionStore::new()),
                engine,
            }),
            port,
        }
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        let router = Router::new()
            .route("/", get(index))
            .nest("/api/chat", chat::router(self.state.clone()))
            .merge(health::router());

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "gateway listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// Serve the chat page
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
