//! Core data model for grid-snapped note documents.
//!
//! Notes live in the cells of a sparse, dynamically-sized grid. Rows and
//! columns are sized by the largest note they hold, so the grid geometry
//! is always derived from the placed items and never stored on its own.
//! Edges are directional connectors between notes.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Continuous geometry ─────────────────────────────────────────────────

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A measured size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Closed containment: points on any edge count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ─── Grid ────────────────────────────────────────────────────────────────

/// A logical grid position. Orders row-major, so all cells of a row are
/// contiguous and sorted by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub column: i32,
}

impl Cell {
    /// Largest row or column index, in either direction, a note may use.
    pub const MAX_INDEX: i32 = 10_000;

    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The cell one column to the right. Saturates at `i32::MAX`.
    pub const fn shifted_right(self) -> Self {
        Self::new(self.row, self.column.saturating_add(1))
    }

    /// Whether both indices lie within `±MAX_INDEX`.
    pub const fn in_bounds(self) -> bool {
        self.row >= -Self::MAX_INDEX
            && self.row <= Self::MAX_INDEX
            && self.column >= -Self::MAX_INDEX
            && self.column <= Self::MAX_INDEX
    }
}

/// One row or column of the grid: its leading-edge coordinate and its size
/// along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDef {
    pub index: i32,
    pub origin: f32,
    pub length: f32,
}

pub type RowDef = LineDef;
pub type ColumnDef = LineDef;

/// Which axis a line definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

/// Materialized grid geometry plus the max-extent maps it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub rows: BTreeMap<i32, RowDef>,
    pub columns: BTreeMap<i32, ColumnDef>,
    /// Largest measured item height per row.
    pub max_row_height: BTreeMap<i32, f32>,
    /// Largest measured item width per column.
    pub max_column_width: BTreeMap<i32, f32>,
}

/// Largest measured size per row and per column, as computed from one set
/// of placed items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxExtents {
    pub row_height: BTreeMap<i32, f32>,
    pub column_width: BTreeMap<i32, f32>,
}

/// Left/right neighbour within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent {
    Left,
    Right,
}

/// The insertion strip following a cell, and the cell it follows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub rect: Rect,
    pub cell: Cell,
}

// ─── Items & edges ───────────────────────────────────────────────────────

/// A note placed on the grid, as supplied by the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: NodeId,
    #[serde(flatten)]
    pub cell: Cell,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rendered size; `None` until the view has measured the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl PlacedItem {
    pub fn new(id: NodeId, cell: Cell) -> Self {
        Self {
            id,
            cell,
            text: None,
            size: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A directional connector between two notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: NodeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    /// An edge without handles, identified as `source->target`.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: NodeId::intern(&format!("{source}->{target}")),
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    /// An edge between two handles, identified as
    /// `{source}_{sourceHandle}:{target}_{targetHandle}`.
    pub fn between_handles(
        source: NodeId,
        source_handle: &str,
        target: NodeId,
        target_handle: &str,
    ) -> Self {
        Self {
            id: NodeId::intern(&format!(
                "{source}_{source_handle}:{target}_{target_handle}"
            )),
            source,
            target,
            source_handle: Some(source_handle.to_string()),
            target_handle: Some(target_handle.to_string()),
        }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_order_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 5), Cell::new(0, -2)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, -2), Cell::new(0, 5), Cell::new(1, 0)]);
    }

    #[test]
    fn shifting_saturates_and_bounds_are_symmetric() {
        assert_eq!(Cell::new(0, i32::MAX).shifted_right(), Cell::new(0, i32::MAX));
        assert!(Cell::new(-Cell::MAX_INDEX, Cell::MAX_INDEX).in_bounds());
        assert!(!Cell::new(0, Cell::MAX_INDEX).shifted_right().in_bounds());
        assert!(!Cell::new(i32::MIN, 0).in_bounds());
    }

    #[test]
    fn rect_contains_is_closed() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(0.0, 5.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn placed_item_flattens_cell() {
        let item = PlacedItem::new(NodeId::intern("3"), Cell::new(2, -1)).with_text("hi");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"3","row":2,"column":-1,"text":"hi"}"#);
    }

    #[test]
    fn handle_edge_id_format() {
        let e = Edge::between_handles(
            NodeId::intern("1"),
            "source_1",
            NodeId::intern("2"),
            "target_1",
        );
        assert_eq!(e.id.as_str(), "1_source_1:2_target_1");
    }
}
