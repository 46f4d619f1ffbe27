//! HTTP API server for the readaloud gateway

pub mod health;
pub mod speech;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{SharedCredentials, SpeechConfig};
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Upstream speech API credential source
    pub credentials: SharedCredentials,

    /// Speech proxy configuration
    pub speech: SpeechConfig,

    /// Shared HTTP client for outbound calls
    pub http: reqwest::Client,
}

impl ApiState {
    /// Create handler state
    #[must_use]
    pub fn new(speech: SpeechConfig, credentials: SharedCredentials) -> Self {
        Self {
            credentials,
            speech,
            http: reqwest::Client::new(),
        }
    }
}

/// Build the full application router
///
/// Every route - success and error alike - goes out through the permissive
/// CORS layer so the browser-hosted mini-apps can call the gateway, and the
/// layer answers `OPTIONS` pre-flights without touching a handler.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/speech", speech::router(state.clone()))
        .merge(health::router())
        .merge(health::status_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given port
    #[must_use]
    pub fn new(port: u16, speech: SpeechConfig, credentials: SharedCredentials) -> Self {
        Self {
            state: Arc::new(ApiState::new(speech, credentials)),
            port,
        }
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

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
