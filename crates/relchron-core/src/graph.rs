//! # Ordering Graph & Conflict Detector
//!
//! Projects before/after assertions onto same-time representatives and
//! reports the simple cycles that make the asserted partial order
//! contradictory.
//!
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.
//!
//! An edge X → Y reads "X happens no later than Y". The graph is simple:
//! repeating an assertion collapses into one edge. Conflict detection is a
//! one-shot build-then-query computation; nothing is maintained
//! incrementally between queries.

use crate::collection::Collection;
use crate::merge::Representatives;
use crate::primitives::MAX_CYCLES;
use crate::types::{AnchorStamp, MarkerId};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// ORDERING GRAPH
// =============================================================================

/// A simple directed graph over same-time representatives.
#[derive(Debug, Clone, Default)]
pub struct OrderGraph {
    /// Every node, including edge-less ones.
    nodes: BTreeSet<MarkerId>,

    /// Adjacency: from-node -> set of to-nodes.
    edges: BTreeMap<MarkerId, BTreeSet<MarkerId>>,
}

impl OrderGraph {
    /// Project a collection's ordering assertions onto representatives.
    ///
    /// For an entity E with representative R(E):
    /// - every `after` target A contributes the edge R(A) → R(E)
    /// - every `before` target B contributes the edge R(E) → R(B)
    ///
    /// Anchor markers additionally order against each other by calendar
    /// comparison: a strictly earlier than b contributes R(a) → R(b).
    ///
    /// Unresolved (dangling) targets still become nodes, so contradictions
    /// that pass through a missing marker are detected all the same.
    #[must_use]
    pub fn build(collection: &Collection, reps: &Representatives) -> Self {
        let mut graph = Self::default();
        let mut anchors: Vec<(MarkerId, AnchorStamp)> = Vec::new();

        for marker in collection.iter() {
            let node = reps.resolve(marker.id());
            graph.nodes.insert(node);

            if let Some(spec) = marker.timespec() {
                for &before in spec.befores.iter().flatten() {
                    graph.insert_edge(node, reps.resolve(before));
                }
                for &after in spec.afters.iter().flatten() {
                    graph.insert_edge(reps.resolve(after), node);
                }
            }

            if let Some(stamp) = marker.anchor_stamp() {
                anchors.push((node, stamp));
            }
        }

        for (i, &(node_a, stamp_a)) in anchors.iter().enumerate() {
            for &(node_b, stamp_b) in &anchors[i + 1..] {
                if node_a == node_b {
                    continue;
                }
                if stamp_a.strictly_before(stamp_b) {
                    graph.insert_edge(node_a, node_b);
                } else if stamp_b.strictly_before(stamp_a) {
                    graph.insert_edge(node_b, node_a);
                }
            }
        }

        graph
    }

    /// Insert an edge, registering both endpoints as nodes.
    fn insert_edge(&mut self, from: MarkerId, to: MarkerId) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.edges.entry(from).or_default().insert(to);
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Successors of a node in deterministic order.
    pub fn successors(&self, node: MarkerId) -> impl Iterator<Item = MarkerId> + '_ {
        self.edges
            .get(&node)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    // =========================================================================
    // CYCLE ENUMERATION
    // =========================================================================

    /// Every simple cycle, each reported exactly once.
    ///
    /// Cycles are rooted at their minimum node: the search explores from
    /// each start node through strictly greater nodes only, closing back on
    /// the start. A self-loop is a 1-element cycle. Output order and cycle
    /// rotation are deterministic. Enumeration stops at `MAX_CYCLES`.
    #[must_use]
    pub fn simple_cycles(&self) -> Vec<Vec<MarkerId>> {
        let mut cycles = Vec::new();
        for &start in &self.nodes {
            if cycles.len() >= MAX_CYCLES {
                break;
            }
            let mut path = vec![start];
            let mut on_path = BTreeSet::from([start]);
            self.close_cycles(start, start, &mut path, &mut on_path, &mut cycles);
        }
        cycles
    }

    /// Whether the graph holds no cycle at all.
    ///
    /// Distinct from "no edges": a disconnected acyclic graph is
    /// conflict-free regardless of size.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.simple_cycles().is_empty()
    }

    /// Recursive DFS step for `simple_cycles`.
    ///
    /// `path` holds the current walk from `start`; depth is bounded by the
    /// node count because every node enters the path at most once.
    fn close_cycles(
        &self,
        start: MarkerId,
        current: MarkerId,
        path: &mut Vec<MarkerId>,
        on_path: &mut BTreeSet<MarkerId>,
        cycles: &mut Vec<Vec<MarkerId>>,
    ) {
        for next in self.successors(current) {
            if cycles.len() >= MAX_CYCLES {
                return;
            }
            if next == start {
                cycles.push(path.clone());
            } else if next > start && !on_path.contains(&next) {
                path.push(next);
                on_path.insert(next);
                self.close_cycles(start, next, path, on_path, cycles);
                path.pop();
                on_path.remove(&next);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
