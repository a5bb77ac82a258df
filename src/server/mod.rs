//! Web host for the browser chat
//!
//! Serves the chat page and a small JSON API over a [`SessionStore`]:
//!
//! | Method   | Path                          | Purpose                          |
//! |----------|-------------------------------|----------------------------------|
//! | `GET`    | `/`                           | Chat page                        |
//! | `GET`    | `/health`                     | Liveness probe                   |
//! | `POST`   | `/api/sessions`               | Start a session                  |
//! | `GET`    | `/api/sessions/:id`           | Log and usage of a session       |
//! | `POST`   | `/api/sessions/:id/messages`  | Submit a message, get the reply  |
//! | `GET`    | `/api/sessions/:id/usage`     | Usage counter                    |
//! | `DELETE` | `/api/sessions/:id`           | End a session                    |

pub mod handlers;
pub mod page;
pub mod store;

pub use store::{spawn_idle_sweeper, SessionHandle, SessionStore};

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::{ChatConfig, ServerConfig};
use crate::error::{ChataiError, Result};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub chat: Arc<ChatConfig>,
}

impl AppState {
    pub fn new(sessions: SessionStore, chat: ChatConfig) -> Self {
        Self {
            sessions: Arc::new(sessions),
            chat: Arc::new(chat),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/api/sessions/:id/messages", post(handlers::submit_message))
        .route("/api/sessions/:id/usage", get(handlers::get_usage))
        .with_state(state)
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ChataiError::Config(format!("Failed to bind {}: {}", address, e)))?;

    tracing::info!("Chat UI listening on http://{}", address);

    let sweeper = spawn_idle_sweeper(state.sessions.clone());
    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    served?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
