//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use crate::util::comma_separated_list;
use axum::http::StatusCode;
use relchron_core::{EventBuilder, MarkerId, RelchronError, TimeMarker};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// EVENT REQUEST
// =============================================================================

/// Body of event create/update requests.
///
/// Relation fields are comma-separated lists of identifier text, the same
/// contract the CLI flags use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub same: Option<String>,
}

impl EventRequest {
    /// Build the event under the given identifier.
    pub fn to_marker(&self, id: MarkerId) -> Result<TimeMarker, RelchronError> {
        let mut builder = EventBuilder::new(self.title.as_str()).id(id);
        if let Some(desc) = &self.desc {
            builder = builder.desc(desc.as_str());
        }
        for target in self.before.as_deref().map(comma_separated_list).unwrap_or_default() {
            builder = builder.before(target.as_str());
        }
        for target in self.after.as_deref().map(comma_separated_list).unwrap_or_default() {
            builder = builder.after(target.as_str());
        }
        for target in self.same.as_deref().map(comma_separated_list).unwrap_or_default() {
            builder = builder.same(target.as_str());
        }
        builder.build()
    }
}

// =============================================================================
// EVENT RESPONSES
// =============================================================================

/// Response to event create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

impl CreatedResponse {
    pub fn success(id: MarkerId) -> Self {
        Self {
            success: true,
            id: Some(id.to_string()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(msg.into()),
        }
    }
}

/// Response carrying one serialized marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<TimeMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarkerResponse {
    pub fn success(marker: TimeMarker) -> Self {
        Self {
            success: true,
            marker: Some(marker),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            marker: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// COLLECTION REPORT
// =============================================================================

/// Consistency report over the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub is_self_contained: bool,
    pub has_no_conflict: bool,
    /// Each conflict is the ordered representative identifiers of a cycle.
    pub conflicts: Vec<Vec<String>>,
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
#[must_use]
pub fn error_status(err: &RelchronError) -> StatusCode {
    match err {
        RelchronError::Validation(_)
        | RelchronError::MalformedIdentifier(_)
        | RelchronError::UnknownType(_) => StatusCode::BAD_REQUEST,
        RelchronError::NotFound(_) => StatusCode::NOT_FOUND,
        RelchronError::DuplicateIdentifier(_) => StatusCode::CONFLICT,
        RelchronError::Serialization(_) | RelchronError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builds_event_with_relations() {
        let target = MarkerId::random();
        let request = EventRequest {
            title: "meeting".to_string(),
            desc: Some("weekly sync".to_string()),
            before: Some(target.to_string()),
            after: None,
            same: None,
        };

        let id = MarkerId::random();
        let marker = request.to_marker(id).expect("build");
        assert_eq!(marker.id(), id);
        assert_eq!(
            marker.timespec().expect("spec").befores,
            Some(vec![target])
        );
    }

    #[test]
    fn request_with_bad_target_text_fails() {
        let request = EventRequest {
            title: "meeting".to_string(),
            desc: None,
            before: Some("nope".to_string()),
            after: None,
            same: None,
        };
        assert!(request.to_marker(MarkerId::random()).is_err());
    }

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let ghost = MarkerId::random();
        assert_eq!(
            error_status(&RelchronError::NotFound(ghost)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&RelchronError::DuplicateIdentifier(ghost)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&RelchronError::MalformedIdentifier("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
