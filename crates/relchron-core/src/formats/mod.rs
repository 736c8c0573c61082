//! # Persistence Formats
//!
//! Pure byte-level serialization of collections. File I/O lives in the app
//! layer; this module only transforms.

pub mod persistence;

pub use persistence::{CollectionDocument, collection_from_bytes, collection_to_bytes};
