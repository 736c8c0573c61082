//! Integration tests for the relchron HTTP API.
//!
//! Uses axum-test to drive the API handlers without starting a real server.
//! Every test gets its own temporary database directory, so mutating
//! endpoints also exercise the atomic save path.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use relchron::api::{
    AppState, CollectionReport, CreatedResponse, EventRequest, HealthResponse, MarkerResponse,
    create_router,
};
use relchron::store::Database;
use relchron_core::MarkerId;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server over a fresh database directory.
///
/// The TempDir is returned so it outlives the server.
fn create_test_server() -> (TestServer, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let db = Database::init(&dir).unwrap();
    let state = AppState::new(db);
    let router = create_router(state);
    (TestServer::new(router).unwrap(), tmp)
}

fn event_body(title: &str) -> serde_json::Value {
    json!({ "title": title })
}

async fn create_event(server: &TestServer, body: &serde_json::Value) -> String {
    let response = server.post("/api/event").json(body).await;
    response.assert_status_ok();
    let created: CreatedResponse = response.json();
    assert!(created.success);
    created.id.unwrap()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _tmp) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// EVENT CREATE/FETCH TESTS
// =============================================================================

#[tokio::test]
async fn test_create_then_get_roundtrip() {
    let (server, _tmp) = create_test_server();

    let id = create_event(&server, &json!({ "title": "wake", "desc": "first thing" })).await;

    let response = server.get(&format!("/api/event/{id}")).await;
    response.assert_status_ok();
    let fetched: MarkerResponse = response.json();
    assert!(fetched.success);

    let marker = fetched.marker.unwrap();
    assert_eq!(marker.id().to_string(), id);
    assert_eq!(marker.title(), Some("wake"));
}

#[tokio::test]
async fn test_create_with_relations() {
    let (server, _tmp) = create_test_server();

    let first = create_event(&server, &event_body("wake")).await;
    let second = create_event(
        &server,
        &json!({ "title": "breakfast", "after": first }),
    )
    .await;

    let response = server.get(&format!("/api/event/{second}")).await;
    let fetched: MarkerResponse = response.json();
    let marker = fetched.marker.unwrap();
    let spec = marker.timespec().unwrap();
    assert_eq!(
        spec.afters,
        Some(vec![MarkerId::parse(&first).unwrap()])
    );
}

#[tokio::test]
async fn test_create_rejects_empty_title() {
    let (server, _tmp) = create_test_server();

    let response = server.post("/api/event").json(&event_body("")).await;
    response.assert_status_bad_request();
    let created: CreatedResponse = response.json();
    assert!(!created.success);
    assert!(created.error.is_some());
}

#[tokio::test]
async fn test_create_rejects_malformed_relation_target() {
    let (server, _tmp) = create_test_server();

    let response = server
        .post("/api/event")
        .json(&json!({ "title": "wake", "before": "not-an-id" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let (server, _tmp) = create_test_server();

    let ghost = MarkerId::random();
    let response = server.get(&format!("/api/event/{ghost}")).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_get_malformed_id_is_400() {
    let (server, _tmp) = create_test_server();

    let response = server.get("/api/event/garbage").await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_list_reflects_created_events() {
    let (server, _tmp) = create_test_server();

    let a = create_event(&server, &event_body("a")).await;
    let b = create_event(&server, &event_body("b")).await;

    let response = server.get("/api/event").await;
    response.assert_status_ok();
    let ids: Vec<String> = response.json();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a));
    assert!(ids.contains(&b));
}

// =============================================================================
// EVENT UPDATE TESTS
// =============================================================================

#[tokio::test]
async fn test_update_replaces_stored_event() {
    let (server, _tmp) = create_test_server();

    let id = create_event(&server, &event_body("draft")).await;

    let response = server
        .post(&format!("/api/event/{id}"))
        .json(&event_body("final"))
        .await;
    response.assert_status_ok();

    let fetched: MarkerResponse = server.get(&format!("/api/event/{id}")).await.json();
    assert_eq!(fetched.marker.unwrap().title(), Some("final"));
}

#[tokio::test]
async fn test_update_under_fresh_id_creates() {
    let (server, _tmp) = create_test_server();

    let id = MarkerId::random();
    let response = server
        .post(&format!("/api/event/{id}"))
        .json(&event_body("adopted"))
        .await;
    response.assert_status_ok();

    let fetched: MarkerResponse = server.get(&format!("/api/event/{id}")).await.json();
    assert_eq!(fetched.marker.unwrap().title(), Some("adopted"));
}

#[tokio::test]
async fn test_update_with_malformed_path_id_is_400() {
    let (server, _tmp) = create_test_server();

    let response = server
        .post("/api/event/garbage")
        .json(&event_body("x"))
        .await;
    response.assert_status_bad_request();
}

// =============================================================================
// COLLECTION REPORT TESTS
// =============================================================================

#[tokio::test]
async fn test_empty_collection_is_consistent() {
    let (server, _tmp) = create_test_server();

    let report: CollectionReport = server.get("/api/collection").await.json();
    assert!(report.is_self_contained);
    assert!(report.has_no_conflict);
    assert!(report.conflicts.is_empty());
}

#[tokio::test]
async fn test_dangling_reference_breaks_self_containment() {
    let (server, _tmp) = create_test_server();

    let ghost = MarkerId::random();
    create_event(&server, &json!({ "title": "c", "after": ghost.to_string() })).await;

    let report: CollectionReport = server.get("/api/collection").await.json();
    assert!(!report.is_self_contained);
    assert!(report.has_no_conflict);
}

#[tokio::test]
async fn test_mutual_before_reports_one_conflict() {
    let (server, _tmp) = create_test_server();

    let a = create_event(&server, &event_body("a")).await;
    let b = create_event(&server, &json!({ "title": "b", "before": a })).await;
    // Rewrite a to also be before b: a -> b and b -> a.
    let response = server
        .post(&format!("/api/event/{a}"))
        .json(&json!({ "title": "a", "before": b }))
        .await;
    response.assert_status_ok();

    let report: CollectionReport = server.get("/api/collection").await.json();
    assert!(!report.has_no_conflict);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].len(), 2);
    assert!(report.conflicts[0].contains(&a));
    assert!(report.conflicts[0].contains(&b));
}

// =============================================================================
// PERSISTENCE TESTS
// =============================================================================

#[tokio::test]
async fn test_mutations_persist_to_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("data");
    let db = Database::init(&dir).unwrap();
    let server = TestServer::new(create_router(AppState::new(db))).unwrap();

    let id = create_event(&server, &event_body("durable")).await;

    // A fresh Database must see the event without going through the server.
    let reopened = Database::open(&dir).unwrap();
    let marker = reopened.collection().get_by_str(&id).unwrap();
    assert_eq!(marker.title(), Some("durable"));
}

#[tokio::test]
async fn test_request_type_roundtrip() {
    // EventRequest itself serializes cleanly, matching the wire contract.
    let request = EventRequest {
        title: "meeting".to_string(),
        desc: None,
        before: Some("a,b".to_string()),
        after: None,
        same: None,
    };
    let json = serde_json::to_string(&request).unwrap();
    let back: EventRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.title, "meeting");
    assert_eq!(back.before.as_deref(), Some("a,b"));
}
