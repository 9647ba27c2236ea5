//! Integration tests: snapshot → layout engine → geometry and structural edits.

use gn_core::LayoutConfig;
use gn_core::edges::EdgeSet;
use gn_core::id::NodeId;
use gn_core::layout::LayoutEngine;
use gn_core::model::*;
use gn_core::snapshot::{MemoryStore, Snapshot, load_document, save_document};
use gn_core::traverse::related_all_nodes;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn fixture() -> Snapshot {
    Snapshot::from_json(include_str!("fixtures/row_chain.json")).unwrap()
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

// ─── Geometry ───────────────────────────────────────────────────────────

#[test]
fn measured_sizes_drive_row_and_column_lengths() {
    let engine = fixture().layout(LayoutConfig::default());
    let grid = engine.grid();

    assert_eq!(grid.columns[&1].length, 180.0);
    assert_eq!(grid.columns[&2].length, 100.0);
    assert_eq!(grid.rows[&2].length, 260.0);
    assert_eq!(grid.columns[&2].origin, 110.0 + 180.0 + 10.0);
    assert_eq!(grid.rows[&3].origin, 220.0 + 260.0 + 10.0);
}

#[test]
fn packing_is_tight_where_nothing_is_measured() {
    let engine = fixture().layout(LayoutConfig::default());
    for axis in [Axis::Row, Axis::Column] {
        let lines: Vec<&LineDef> = engine.grid().lines(axis).values().collect();
        for pair in lines.windows(2) {
            assert_eq!(pair[1].origin, pair[0].origin + pair[0].length + 10.0);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
    }
}

#[test]
fn every_materialized_cell_round_trips_through_its_top_left() {
    let engine = fixture().layout(LayoutConfig::default());
    let grid = engine.grid();
    for &row in grid.rows.keys() {
        for &column in grid.columns.keys() {
            let cell = Cell::new(row, column);
            let rect = engine.rect_of(cell).unwrap();
            assert_eq!(engine.find_rect_at(rect.top_left()), Some((rect, cell)));
        }
    }
}

#[test]
fn gap_after_a_wide_column_is_found_at_its_trailing_edge() {
    let engine = fixture().layout(LayoutConfig::default());
    let wide = engine.rect_of(Cell::new(0, 1)).unwrap();
    let probe = Point::new(wide.right() + 4.0, wide.y + 10.0);
    let gap = engine.find_gap_at(probe).unwrap();
    assert_eq!(gap.cell, Cell::new(0, 1));
    assert_eq!(gap.rect, Rect::new(wide.right(), wide.y, 10.0, wide.height));
}

// ─── Structural edits ───────────────────────────────────────────────────

#[test]
fn insert_then_place_keeps_every_address_unique() {
    let mut engine = fixture().layout(LayoutConfig::default());
    engine.insert_and_shift(Cell::new(0, 1)).unwrap();
    engine.place(id("new"), Cell::new(0, 1), None).unwrap();

    let row: Vec<(i32, NodeId)> = engine
        .occupancy()
        .row(0)
        .map(|(c, o)| (c.column, o.id))
        .collect();
    assert_eq!(
        row,
        vec![(0, id("1")), (1, id("new")), (2, id("2")), (3, id("3"))]
    );

    let ids: HashSet<NodeId> = engine.items().map(|(id, _, _)| id).collect();
    assert_eq!(ids.len(), engine.occupancy().len());
    // The wide note carried its width to its new column; column 1 is now
    // sized by the note two rows down.
    assert_eq!(engine.grid().columns[&2].length, 180.0);
    assert_eq!(engine.grid().columns[&1].length, 140.0);
}

#[test]
fn deleting_the_middle_of_a_chain_bridges_it() {
    let snapshot = fixture();
    let mut engine = snapshot.layout(LayoutConfig::default());
    let mut edges: EdgeSet = snapshot.edges.clone();

    let deletion = engine
        .delete_and_reconnect(id("2"), &mut edges, Edge::new)
        .unwrap();

    assert_eq!(deletion.removed_edges.len(), 3);
    assert!(edges.connects(id("1"), id("3")));
    assert_eq!(edges.len(), 1);
}

#[test]
fn related_nodes_follow_edges_both_ways() {
    let snapshot = fixture();
    let related: HashSet<NodeId> = related_all_nodes(&[id("2")], &snapshot.edges)
        .into_iter()
        .collect();
    assert_eq!(
        related,
        HashSet::from([id("1"), id("2"), id("3"), id("4")])
    );
    let from_leaf: HashSet<NodeId> = related_all_nodes(&[id("3")], &snapshot.edges)
        .into_iter()
        .collect();
    assert_eq!(from_leaf, HashSet::from([id("1"), id("2"), id("3")]));
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn save_load_preserves_occupancy_and_edges() {
    let saved = fixture();
    let engine = saved.layout(LayoutConfig::default());

    let mut store = MemoryStore::new();
    save_document(&mut store, "chain", &saved).unwrap();
    let restored = load_document(&store, "chain").unwrap();
    let rebuilt = restored.layout(LayoutConfig::default());

    let before: Vec<(NodeId, Cell)> = engine.items().map(|(id, c, _)| (id, c)).collect();
    let after: Vec<(NodeId, Cell)> = rebuilt.items().map(|(id, c, _)| (id, c)).collect();
    assert_eq!(before, after);
    assert_eq!(restored.edges, saved.edges);
}

#[test]
fn negative_cells_widen_the_window_downward() {
    let config = LayoutConfig {
        initial_count: 2,
        ..LayoutConfig::default()
    };
    let items = [PlacedItem::new(id("far"), Cell::new(-4, -6))];
    let engine = LayoutEngine::from_items(config, &items);
    assert_eq!(engine.grid().rows.keys().next(), Some(&-9));
    assert_eq!(engine.grid().columns.keys().next(), Some(&-11));
    assert_eq!(engine.grid().rows[&0].origin, 0.0);
    assert_eq!(engine.rect_of_item(id("far")).unwrap().x, -660.0);
}
