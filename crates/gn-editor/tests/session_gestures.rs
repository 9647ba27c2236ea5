//! Integration tests: editor session gestures on a loaded document
//! (gn-editor ↔ gn-core ↔ gn-render).

use gn_core::LayoutConfig;
use gn_core::id::NodeId;
use gn_core::model::*;
use gn_core::snapshot::{MemoryStore, Snapshot, SnapshotError};
use gn_editor::{Session, create_document, list_documents};
use pretty_assertions::assert_eq;
use std::cell::Cell as Counter;
use std::rc::Rc;

fn fixture() -> Snapshot {
    Snapshot::from_json(include_str!("fixtures/publish_flow.json")).unwrap()
}

fn open() -> Session {
    Session::from_snapshot(LayoutConfig::default(), &fixture()).unwrap()
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn snapshot_restores_texts_edges_and_handles() {
    let s = open();
    assert_eq!(s.node_count(), 4);
    assert_eq!(s.edges().len(), 3);
    assert_eq!(s.text(id("4")), Some("Publish"));
    assert_eq!(s.handles().handles(id("2")).len(), 2);
    assert_eq!(s.handles().handles(id("4")).len(), 1);
    assert_eq!(s.snapshot(), fixture());
}

// ─── Structural edits ───────────────────────────────────────────────────

#[test]
fn deleting_the_middle_note_bridges_the_row() {
    let mut s = open();
    assert!(s.delete_node(id("2")));

    assert!(s.edges().connects(id("1"), id("3")));
    assert!(s.edges().iter().all(|e| !e.touches(id("2"))));
    assert_eq!(s.edges().len(), 2);
    // Column 1 is left empty; nothing shifts back.
    assert_eq!(s.engine().position_of(id("3")), Some(Cell::new(0, 2)));
    assert!(!s.engine().is_occupied(Cell::new(0, 1)));
}

#[test]
fn gap_insert_shifts_only_its_row() {
    let mut s = open();
    let gap = s.hover_gap(Point::new(105.0, 50.0)).unwrap();
    assert_eq!(gap.cell, Cell::new(0, 0));

    let new = s.insert_at_gap(Point::new(105.0, 50.0)).unwrap();
    assert_eq!(new, id("5"));
    assert_eq!(s.engine().position_of(new), Some(Cell::new(0, 1)));
    assert_eq!(s.engine().position_of(id("2")), Some(Cell::new(0, 2)));
    assert_eq!(s.engine().position_of(id("3")), Some(Cell::new(0, 3)));
    assert_eq!(s.engine().position_of(id("4")), Some(Cell::new(1, 2)));

    assert!(s.edges().connects(id("1"), new));
    assert!(s.edges().connects(new, id("2")));
    assert!(!s.edges().connects(id("1"), id("2")));
    assert_eq!(s.edges().len(), 4);
}

#[test]
fn connection_dropped_below_creates_a_linked_note() {
    let mut s = open();
    let below = s.engine().rect_of(Cell::new(3, 2)).unwrap();
    let point = Point::new(below.x + 10.0, below.y + 10.0);

    let new = s.connect_to_empty_cell(id("4"), point).unwrap();
    assert_eq!(s.engine().position_of(new), Some(Cell::new(3, 2)));
    assert!(s.edges().connects(id("4"), new));
}

// ─── Highlighting and notification ──────────────────────────────────────

#[test]
fn highlight_reaches_every_ancestor() {
    let mut s = open();
    let lone = s.add_node_in_cell(Cell::new(5, 5)).unwrap();
    s.highlight(&[id("4")]);
    for n in ["1", "2", "3", "4"] {
        assert!(s.is_highlighted(id(n)), "{n} should be highlighted");
    }
    assert!(!s.is_highlighted(lone));
}

#[test]
fn subscribers_see_every_rebuild_until_unsubscribed() {
    let mut s = open();
    let seen = Rc::new(Counter::new(0));
    let counter = seen.clone();
    let sub = s.subscribe(move |_| counter.set(counter.get() + 1));

    s.add_node_in_cell(Cell::new(2, 0));
    assert_eq!(seen.get(), 1);

    assert!(s.unsubscribe(sub));
    s.resize_node(id("1"), 100.0, 300.0);
    assert_eq!(seen.get(), 1);
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn edits_survive_save_and_load() {
    let mut store = MemoryStore::new();
    let doc = create_document(&mut store, Some("Publishing")).unwrap();

    let mut s = open();
    s.update_text(id("3"), "Review twice");
    s.resize_node(id("3"), 150.0, 120.0);
    s.save(&mut store, &doc.id).unwrap();

    let reopened = Session::load(&store, &doc.id, LayoutConfig::default()).unwrap();
    assert_eq!(reopened.text(id("3")), Some("Review twice"));
    assert_eq!(reopened.grid().columns[&2].length, 150.0);
    assert_eq!(reopened.snapshot(), s.snapshot());
    assert_eq!(list_documents(&store).unwrap()[0].title, "Publishing");
}

#[test]
fn unknown_document_fails_to_load() {
    let store = MemoryStore::new();
    assert!(Session::load(&store, "42", LayoutConfig::default()).is_err());
}

#[test]
fn stored_document_with_a_dangling_edge_fails_to_load() {
    let mut store = MemoryStore::new();
    let mut doc = fixture();
    doc.nodes.retain(|n| n.id != id("4"));
    // Saving does not check; loading does.
    gn_core::snapshot::save_document(&mut store, "broken", &doc).unwrap();
    assert!(matches!(
        Session::load(&store, "broken", LayoutConfig::default()),
        Err(SnapshotError::Inconsistent(_))
    ));
}
