//! # relchron-core
//!
//! The deterministic consistency engine for relchron - THE LOGIC.
//!
//! relchron records discrete events (and calendar anchor markers) whose
//! chronological order is only partially known, expressed through pairwise
//! relations - strictly-before, strictly-after, same-time-as - between
//! identifiers. This crate is the part with real algorithmic content:
//!
//! - the identifier-keyed entity store with its dangling-reference tracker
//! - the union-find merger collapsing same-time groups into one node
//! - the ordering graph builder and the cycle enumerator that reports
//!   contradictions
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no file I/O
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no `HashMap`, no floats
//! - Single-threaded and synchronous; embedding hosts serialize access
//!   externally
//!
//! Contradictory orderings and dangling references are query results, not
//! errors: callers inspect `Collection::conflicts` and
//! `Collection::is_self_contained` and decide what to do.

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod collection;
pub mod formats;
pub mod graph;
pub mod merge;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AnchorStamp, DateMarker, DateTimeMarker, Event, MarkerId, RelTimeSpec, RelchronError,
    TimeMarker,
};

// =============================================================================
// RE-EXPORTS: Consistency Engine
// =============================================================================

pub use builder::{EventBuilder, TargetRef};
pub use collection::Collection;
pub use graph::OrderGraph;
pub use merge::Representatives;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{CollectionDocument, collection_from_bytes, collection_to_bytes};
