//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Mutating handlers persist the collection (atomic whole-file replace)
//! before responding, so a successful response means the change is on disk.

use super::{
    AppState,
    types::{
        CollectionReport, CreatedResponse, EventRequest, HealthResponse, MarkerResponse,
        error_status,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use relchron_core::MarkerId;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// EVENT LIST HANDLERS
// =============================================================================

/// List every stored identifier.
pub async fn list_events_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db.read().await;
    let ids: Vec<String> = db.list().iter().map(|id| id.to_string()).collect();
    (StatusCode::OK, Json(ids))
}

/// Create an event under a fresh identifier.
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> impl IntoResponse {
    let id = MarkerId::random();
    let marker = match request.to_marker(id) {
        Ok(m) => m,
        Err(e) => {
            return (
                error_status(&e),
                Json(CreatedResponse::error(e.to_string())),
            );
        }
    };

    let mut db = state.db.write().await;
    if let Err(e) = db.add(marker) {
        return (
            error_status(&e),
            Json(CreatedResponse::error(e.to_string())),
        );
    }
    if let Err(e) = db.save() {
        return (
            error_status(&e),
            Json(CreatedResponse::error(e.to_string())),
        );
    }
    (StatusCode::OK, Json(CreatedResponse::success(id)))
}

// =============================================================================
// SINGLE EVENT HANDLERS
// =============================================================================

/// Fetch one marker in its serialized form.
pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let db = state.db.read().await;
    match db.get_by_str(&id) {
        Ok(marker) => (StatusCode::OK, Json(MarkerResponse::success(marker.clone()))),
        Err(e) => (error_status(&e), Json(MarkerResponse::error(e.to_string()))),
    }
}

/// Update = add-or-replace under the path identifier.
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<EventRequest>,
) -> impl IntoResponse {
    let marker_id = match MarkerId::parse(&id) {
        Ok(parsed) => parsed,
        Err(e) => {
            return (
                error_status(&e),
                Json(CreatedResponse::error(e.to_string())),
            );
        }
    };
    let marker = match request.to_marker(marker_id) {
        Ok(m) => m,
        Err(e) => {
            return (
                error_status(&e),
                Json(CreatedResponse::error(e.to_string())),
            );
        }
    };

    let mut db = state.db.write().await;
    db.upsert(marker);
    if let Err(e) = db.save() {
        return (
            error_status(&e),
            Json(CreatedResponse::error(e.to_string())),
        );
    }
    (StatusCode::OK, Json(CreatedResponse::success(marker_id)))
}

// =============================================================================
// COLLECTION REPORT HANDLER
// =============================================================================

/// Consistency report: self-containment plus the full conflict list.
pub async fn collection_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db.read().await;

    let conflicts: Vec<Vec<String>> = db
        .conflicts()
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|id| id.to_string()).collect())
        .collect();

    let report = CollectionReport {
        is_self_contained: db.is_self_contained(),
        has_no_conflict: conflicts.is_empty(),
        conflicts,
    };
    (StatusCode::OK, Json(report))
}
