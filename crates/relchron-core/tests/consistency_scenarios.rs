//! Scenario tests for the consistency engine.
//!
//! Each test tells one small story: a handful of markers, their relative
//! time assertions, and the self-containment / conflict verdict a caller
//! would see.

#![allow(clippy::unwrap_used, clippy::panic)]

use relchron_core::{Collection, EventBuilder, MarkerId, TimeMarker};

// =============================================================================
// HELPERS
// =============================================================================

fn collection_of(markers: Vec<TimeMarker>) -> Collection {
    Collection::from_markers(markers).expect("collection")
}

// =============================================================================
// ORDERING SCENARIOS
// =============================================================================

#[test]
fn wake_before_breakfast_is_consistent() {
    let breakfast = EventBuilder::new("breakfast").build().unwrap();
    let wake = EventBuilder::new("wake").before(&breakfast).build().unwrap();

    let collection = collection_of(vec![wake, breakfast]);

    assert!(collection.is_self_contained());
    assert!(collection.conflicts().is_empty());
    assert!(collection.has_no_conflict());
}

#[test]
fn mutual_before_is_exactly_one_two_cycle() {
    let a_id = MarkerId::random();
    let b = EventBuilder::new("b").before(a_id).build().unwrap();
    let a = EventBuilder::new("a").id(a_id).before(&b).build().unwrap();
    let b_id = b.id();

    let collection = collection_of(vec![a, b]);
    let conflicts = collection.conflicts();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].len(), 2);
    assert!(conflicts[0].contains(&a_id));
    assert!(conflicts[0].contains(&b_id));
    assert!(!collection.has_no_conflict());
}

#[test]
fn same_time_merge_exposes_an_indirect_contradiction() {
    // X same Y, Y same Z, X before W, W before Z. No two events contradict
    // each other directly; the collapsed X/Y/Z node does.
    let w_id = MarkerId::random();
    let z = EventBuilder::new("z").build().unwrap();
    let y = EventBuilder::new("y").same(&z).build().unwrap();
    let x = EventBuilder::new("x").same(&y).before(w_id).build().unwrap();
    let w = EventBuilder::new("w").id(w_id).before(&z).build().unwrap();

    let representative = x.id().min(y.id()).min(z.id());
    let collection = collection_of(vec![x, y, z, w]);
    let conflicts = collection.conflicts();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].len(), 2);
    assert!(conflicts[0].contains(&w_id));
    assert!(conflicts[0].contains(&representative));
}

#[test]
fn disconnected_components_do_not_conflict() {
    let b = EventBuilder::new("b").build().unwrap();
    let a = EventBuilder::new("a").before(&b).build().unwrap();
    let d = EventBuilder::new("d").build().unwrap();
    let c = EventBuilder::new("c").after(&d).build().unwrap();
    let lonely = EventBuilder::new("lonely").build().unwrap();

    let collection = collection_of(vec![a, b, c, d, lonely]);
    assert!(collection.has_no_conflict());
}

#[test]
fn self_reference_surfaces_as_a_one_cycle() {
    let id = MarkerId::random();
    let marker = EventBuilder::new("ouroboros").id(id).before(id).build().unwrap();

    let collection = collection_of(vec![marker]);
    assert!(collection.is_self_contained());
    assert_eq!(collection.conflicts(), vec![vec![id]]);
}

// =============================================================================
// SELF-CONTAINMENT SCENARIOS
// =============================================================================

#[test]
fn missing_reference_resolves_when_target_is_added() {
    let missing = MarkerId::random();
    let c = EventBuilder::new("c").after(missing).build().unwrap();

    let mut collection = collection_of(vec![c]);
    assert!(!collection.is_self_contained());

    let target = EventBuilder::new("target").id(missing).build().unwrap();
    collection.add(target).expect("add");
    assert!(collection.is_self_contained());
}

#[test]
fn containment_tracks_every_relation_kind() {
    let ghost_b = MarkerId::random();
    let ghost_a = MarkerId::random();
    let ghost_s = MarkerId::random();

    let e = EventBuilder::new("e")
        .before(ghost_b)
        .after(ghost_a)
        .same(ghost_s)
        .build()
        .unwrap();
    let mut collection = collection_of(vec![e]);
    assert_eq!(collection.dangling_refs().len(), 3);

    for ghost in [ghost_b, ghost_a, ghost_s] {
        let filler = EventBuilder::new("filler").id(ghost).build().unwrap();
        collection.add(filler).expect("add");
    }
    assert!(collection.is_self_contained());
}

// =============================================================================
// ANCHOR SCENARIOS
// =============================================================================

#[test]
fn event_pinned_between_reversed_anchors_conflicts() {
    let may = TimeMarker::date_from_str(MarkerId::random(), "2021-05-01").unwrap();
    let april = TimeMarker::date_from_str(MarkerId::random(), "2021-04-01").unwrap();
    let e = EventBuilder::new("impossible")
        .after(&may)
        .before(&april)
        .build()
        .unwrap();

    let collection = collection_of(vec![may, april, e]);
    assert!(!collection.has_no_conflict());
}

#[test]
fn event_pinned_between_ordered_anchors_is_fine() {
    let april = TimeMarker::date_from_str(MarkerId::random(), "2021-04-01").unwrap();
    let may = TimeMarker::date_from_str(MarkerId::random(), "2021-05-01").unwrap();
    let e = EventBuilder::new("trip")
        .after(&april)
        .before(&may)
        .build()
        .unwrap();

    let collection = collection_of(vec![april, may, e]);
    assert!(collection.has_no_conflict());
}

// =============================================================================
// QUERY STABILITY
// =============================================================================

#[test]
fn repeated_conflict_queries_are_identical() {
    let a_id = MarkerId::random();
    let b = EventBuilder::new("b").before(a_id).build().unwrap();
    let a = EventBuilder::new("a").id(a_id).before(&b).build().unwrap();
    let lonely = EventBuilder::new("lonely").build().unwrap();

    let collection = collection_of(vec![a, b, lonely]);
    assert_eq!(collection.conflicts(), collection.conflicts());
}
