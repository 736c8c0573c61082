//! # Persistence Format
//!
//! JSON document serialization for collections.
//!
//! The persisted shape is a single collection-level document:
//!
//! ```json
//! { "collection": [ { "type": "event", "data": { ... } }, ... ] }
//! ```
//!
//! Entry order in the array is not significant; the store iterates in
//! identifier order on write, so save → load → save is byte-stable.
//!
//! Deserialization validates before parsing:
//! - a document size cap (`MAX_DOCUMENT_SIZE`) guards allocation
//! - every entry's `type` tag is checked against the known set, so an
//!   unrecognized tag fails with `UnknownType` rather than a generic
//!   serde message

use crate::collection::Collection;
use crate::primitives::MAX_DOCUMENT_SIZE;
use crate::types::{RelchronError, TimeMarker};
use serde::{Deserialize, Serialize};

/// Type tags accepted in persisted entries.
const KNOWN_TYPE_TAGS: [&str; 3] = ["event", "date", "absolute_date_time"];

/// Top-level key of the persisted document.
const K_COLLECTION: &str = "collection";

// =============================================================================
// DOCUMENT SHAPE
// =============================================================================

/// The collection-level persisted document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectionDocument {
    #[serde(rename = "collection")]
    pub entries: Vec<TimeMarker>,
}

impl From<&Collection> for CollectionDocument {
    fn from(collection: &Collection) -> Self {
        Self {
            entries: collection.iter().cloned().collect(),
        }
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a collection to a JSON document.
///
/// This is a pure transformation - no file I/O.
pub fn collection_to_bytes(collection: &Collection) -> Result<Vec<u8>, RelchronError> {
    let document = CollectionDocument::from(collection);
    serde_json::to_vec_pretty(&document).map_err(|e| RelchronError::Serialization(e.to_string()))
}

/// Deserialize a collection from a JSON document.
///
/// This is a pure transformation - no file I/O. Duplicate identifiers in
/// the document fail with `DuplicateIdentifier`.
pub fn collection_from_bytes(bytes: &[u8]) -> Result<Collection, RelchronError> {
    // Validate maximum size BEFORE any parsing.
    if bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(RelchronError::Serialization(format!(
            "Document size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_DOCUMENT_SIZE
        )));
    }

    let raw: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| RelchronError::Serialization(e.to_string()))?;

    // Check type tags up front so an unknown tag reports as such.
    let entries = raw
        .get(K_COLLECTION)
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            RelchronError::Serialization(format!("Document has no `{K_COLLECTION}` array"))
        })?;
    for entry in entries {
        let tag = entry
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| RelchronError::Serialization("Entry has no `type` tag".to_string()))?;
        if !KNOWN_TYPE_TAGS.contains(&tag) {
            return Err(RelchronError::UnknownType(tag.to_string()));
        }
    }

    let document: CollectionDocument =
        serde_json::from_value(raw).map_err(|e| RelchronError::Serialization(e.to_string()))?;
    Collection::from_markers(document.entries)
}

// =============================================================================
// TESTS
// =============================================================================
