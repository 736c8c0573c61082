//! # Same-Time Equivalence Merger
//!
//! Entities linked transitively by `same` assertions must act as one
//! timeline node before ordering is evaluated ("the morning of the meeting"
//! and "the meeting" may be asserted same-time). This module computes that
//! partition as a union-find over marker identifiers.
//!
//! Root resolution is iterative with path compression; merge chains never
//! recurse. A `same` list whose ids already belong to two different groups
//! merges every referenced group into one, so the partition does not depend
//! on the order entities were stored in. The canonical representative of
//! each group is its minimum identifier, which makes the output stable
//! under permutation and repeated computation.

use crate::collection::Collection;
use crate::types::MarkerId;
use std::collections::BTreeMap;

// =============================================================================
// REPRESENTATIVE MAP
// =============================================================================

/// The computed partition: identifier → canonical representative.
///
/// Covers every stored entity plus any identifier referenced by a `same`
/// list; anything else resolves to itself.
#[derive(Debug, Clone, Default)]
pub struct Representatives {
    root: BTreeMap<MarkerId, MarkerId>,
}

impl Representatives {
    /// Compute the same-time partition of a collection.
    #[must_use]
    pub fn compute(collection: &Collection) -> Self {
        let mut sets = DisjointSets::default();
        for marker in collection.iter() {
            if let Some(spec) = marker.timespec() {
                for &other in spec.sames.iter().flatten() {
                    sets.union(marker.id(), other);
                }
            }
        }
        Self {
            root: sets.into_roots(),
        }
    }

    /// Canonical representative for an identifier.
    ///
    /// Identifiers outside every merged group map to themselves.
    #[must_use]
    pub fn resolve(&self, id: MarkerId) -> MarkerId {
        self.root.get(&id).copied().unwrap_or(id)
    }

    /// Number of identifiers that belong to some merged group.
    #[must_use]
    pub fn merged_len(&self) -> usize {
        self.root.len()
    }
}

// =============================================================================
// DISJOINT SETS
// =============================================================================

/// Union-find over marker identifiers.
///
/// Identifiers enter the structure lazily on first use. The smaller root
/// absorbs the larger on union, keeping the eventual representative the
/// minimum identifier of its group.
#[derive(Debug, Default)]
struct DisjointSets {
    parent: BTreeMap<MarkerId, MarkerId>,
}

impl DisjointSets {
    /// Root of `id`, compressing the walked chain.
    fn find(&mut self, id: MarkerId) -> MarkerId {
        self.parent.entry(id).or_insert(id);

        let mut root = id;
        loop {
            let up = self.parent.get(&root).copied().unwrap_or(root);
            if up == root {
                break;
            }
            root = up;
        }

        // Path compression: repoint the walked chain directly at the root.
        let mut current = id;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    fn union(&mut self, a: MarkerId, b: MarkerId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        if root_a < root_b {
            self.parent.insert(root_b, root_a);
        } else {
            self.parent.insert(root_a, root_b);
        }
    }

    /// Flatten into a fully-resolved identifier → root map.
    fn into_roots(mut self) -> BTreeMap<MarkerId, MarkerId> {
        let ids: Vec<MarkerId> = self.parent.keys().copied().collect();
        ids.into_iter().map(|id| (id, self.find(id))).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
