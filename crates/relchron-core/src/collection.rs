//! # Entity Store
//!
//! The identifier-keyed collection owning all time markers, with an
//! incrementally maintained dangling-reference index.
//!
//! Uses `BTreeMap` exclusively for deterministic ordering.
//! No `HashMap` allowed.
//!
//! The dangling index maps a referenced-but-missing identifier to the
//! ordered list of stored identifiers that reference it, across every
//! relation kind. Invariant: an identifier is a key of the index iff some
//! stored entity references it and it is not itself stored. This makes the
//! self-containment query O(1).

use crate::graph::OrderGraph;
use crate::merge::Representatives;
use crate::types::{MarkerId, RelchronError, TimeMarker};
use std::collections::BTreeMap;

// =============================================================================
// COLLECTION
// =============================================================================

/// An identifier-keyed store of time markers.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Marker storage: id -> marker.
    markers: BTreeMap<MarkerId, TimeMarker>,

    /// Dangling index: missing target id -> ids of markers referencing it.
    dangling: BTreeMap<MarkerId, Vec<MarkerId>>,
}

impl Collection {
    /// Create a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from owned markers, rejecting duplicate ids.
    pub fn from_markers(
        markers: impl IntoIterator<Item = TimeMarker>,
    ) -> Result<Self, RelchronError> {
        let mut collection = Self::new();
        for marker in markers {
            collection.add(marker)?;
        }
        Ok(collection)
    }

    /// Add a marker, failing when its identifier is already stored.
    ///
    /// On success the dangling index is updated: the new id's bucket (if
    /// any) is dropped, and the new marker's unresolved relation targets
    /// gain a back-reference to it.
    pub fn add(&mut self, marker: TimeMarker) -> Result<(), RelchronError> {
        let id = marker.id();
        if self.markers.contains_key(&id) {
            return Err(RelchronError::DuplicateIdentifier(id));
        }
        self.insert_tracked(marker);
        Ok(())
    }

    /// Add-or-replace under the marker's identifier.
    ///
    /// Replacing first retracts the old marker's contributions to the
    /// dangling index, then inserts the new one as `add` would. Returns
    /// the replaced marker, if any.
    pub fn upsert(&mut self, marker: TimeMarker) -> Option<TimeMarker> {
        let previous = self.markers.remove(&marker.id());
        if let Some(old) = &previous {
            self.retract_refs(old);
        }
        self.insert_tracked(marker);
        previous
    }

    /// Look up a marker by identifier.
    pub fn get(&self, id: MarkerId) -> Result<&TimeMarker, RelchronError> {
        self.markers.get(&id).ok_or(RelchronError::NotFound(id))
    }

    /// Look up a marker by the identifier's canonical text form.
    pub fn get_by_str(&self, text: &str) -> Result<&TimeMarker, RelchronError> {
        let id = MarkerId::parse(text)?;
        self.get(id)
    }

    /// All stored identifiers.
    #[must_use]
    pub fn list(&self) -> Vec<MarkerId> {
        self.markers.keys().copied().collect()
    }

    /// All stored markers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeMarker> {
        self.markers.values()
    }

    /// Whether an identifier is stored.
    #[must_use]
    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.contains_key(&id)
    }

    /// Number of stored markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Whether every referenced identifier resolves to a stored marker.
    #[must_use]
    pub fn is_self_contained(&self) -> bool {
        self.dangling.is_empty()
    }

    /// The dangling index: missing id -> referencing ids.
    #[must_use]
    pub fn dangling_refs(&self) -> &BTreeMap<MarkerId, Vec<MarkerId>> {
        &self.dangling
    }

    /// All ordering contradictions in the collection.
    ///
    /// Merges same-time groups, projects before/after assertions (and
    /// anchor comparisons) onto representatives, and enumerates the simple
    /// cycles of the resulting graph. Each cycle is the ordered sequence of
    /// representative identifiers involved. The graph is rebuilt fresh on
    /// every call.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Vec<MarkerId>> {
        let reps = Representatives::compute(self);
        OrderGraph::build(self, &reps).simple_cycles()
    }

    /// Whether the asserted partial order is contradiction-free.
    #[must_use]
    pub fn has_no_conflict(&self) -> bool {
        self.conflicts().is_empty()
    }

    /// Insert a marker and update the dangling index.
    ///
    /// The marker is stored before its targets are scanned, so an entity
    /// referencing its own identifier never registers as dangling.
    fn insert_tracked(&mut self, marker: TimeMarker) {
        let id = marker.id();
        let targets: Vec<MarkerId> = marker
            .timespec()
            .map(|spec| spec.targets().collect())
            .unwrap_or_default();

        self.dangling.remove(&id);
        self.markers.insert(id, marker);

        for target in targets {
            if !self.markers.contains_key(&target) {
                self.dangling.entry(target).or_default().push(id);
            }
        }
    }

    /// Remove a replaced marker's back-references from the dangling index.
    fn retract_refs(&mut self, old: &TimeMarker) {
        let Some(spec) = old.timespec() else {
            return;
        };
        let id = old.id();
        for target in spec.targets() {
            if let Some(referrers) = self.dangling.get_mut(&target) {
                referrers.retain(|&r| r != id);
                if referrers.is_empty() {
                    self.dangling.remove(&target);
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
