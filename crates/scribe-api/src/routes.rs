//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use scribe_core::{ScribeConfig, ScribeError};

use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ScribeConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin: {}", e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(handlers::SESSION_HEADER),
        ])
        .allow_credentials(true)
}

/// Create the axum Router with all routes and middleware.
///
/// `/process` and `/reset` are also served with a trailing slash, the form
/// existing clients call.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/process", post(handlers::process))
        .route("/process/", post(handlers::process))
        .route("/reset", post(handlers::reset))
        .route("/reset/", post(handlers::reset))
        .route("/health", get(handlers::health))
        .route("/sessions/{id}", get(handlers::session_snapshot))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured host and port.
pub async fn start_server(config: &ScribeConfig, state: AppState) -> Result<(), ScribeError> {
    let addr = format!("{}:{}", config.general.host, config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScribeError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| ScribeError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
