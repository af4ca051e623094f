//! HTTP server wiring for the relay

use axum::{
    body::Bytes,
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::RelayHandler;
use super::transport::{HttpTransport, UpstreamTransport};
use crate::config::AppConfig;

/// Shared state for the relay
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<AppConfig>,
    pub transport: Arc<dyn UpstreamTransport>,
}

/// Build the relay router. Exposed so tests can drive it in-process.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the relay server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let transport = HttpTransport::new()?;
    let state = RelayState {
        config: Arc::new(config.clone()),
        transport: Arc::new(transport),
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("report-proxy listening on {}", addr);
    tracing::info!("Relaying to {}", config.upstream.generate_url());

    Ok(axum::serve(listener, app).await?)
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Relay handler for POST /api/generate
async fn generate_handler(State(state): State<RelayState>, body: Bytes) -> Response {
    let handler = RelayHandler::new(state);
    handler.handle(body).await
}
