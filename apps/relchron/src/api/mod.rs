//! # relchron HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /api/event` - List stored identifiers
//! - `POST /api/event` - Create an event under a fresh identifier
//! - `GET  /api/event/{id}` - Fetch one marker
//! - `POST /api/event/{id}` - Update (add-or-replace) under that identifier
//! - `GET  /api/collection` - Self-containment + conflict report
//! - `GET  /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `RELCHRON_CORS_ORIGINS`: Comma-separated list of allowed origins, or
//!   "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `relchron::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    collection_handler, create_event_handler, get_event_handler, health_handler,
    list_events_handler, update_event_handler,
};
#[allow(unused_imports)]
pub use types::{
    CollectionReport, CreatedResponse, EventRequest, HealthResponse, MarkerResponse, error_status,
};

use crate::store::Database;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use relchron_core::RelchronError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the open database.
///
/// The collection is not designed for concurrent mutation; the `RwLock`
/// serializes access across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Database>>,
}

impl AppState {
    /// Create new app state over an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `RELCHRON_CORS_ORIGINS`:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("RELCHRON_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (RELCHRON_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in RELCHRON_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No RELCHRON_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/event",
            get(handlers::list_events_handler).post(handlers::create_event_handler),
        )
        .route(
            "/api/event/{id}",
            get(handlers::get_event_handler).post(handlers::update_event_handler),
        )
        .route("/api/collection", get(handlers::collection_handler))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server over an open database.
pub async fn run_server(addr: &str, db: Database) -> Result<(), RelchronError> {
    let state = AppState::new(db);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RelchronError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("relchron HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| RelchronError::Io(format!("Server error: {}", e)))
}
