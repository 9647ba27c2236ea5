//! Grid layout engine.
//!
//! Owns the grid geometry and the occupancy index, and keeps them in step:
//! every call that changes occupancy or a measured size rebuilds the whole
//! geometry before returning, then fires the grid-changed signal. Callers
//! never observe a grid that lags behind the notes placed on it.
//!
//! Row heights and column widths come from the largest measured note in
//! each row/column; unmeasured lines use the configured default length.

use crate::config::LayoutConfig;
use crate::edges::EdgeSet;
use crate::gap;
use crate::geometry::build_axis;
use crate::id::NodeId;
use crate::model::*;
use crate::notify::{GridSignal, Subscription};
use crate::occupancy::{OccupancyIndex, Occupant};
use std::ops::RangeInclusive;

/// Largest measured height per row and width per column over `items`.
///
/// Built from scratch on every call, so a note that shrank or was removed
/// no longer holds its row or column open.
pub fn compute_max_extents<'a>(items: impl IntoIterator<Item = &'a PlacedItem>) -> MaxExtents {
    extents_of(
        items
            .into_iter()
            .filter_map(|item| item.size.map(|size| (item.cell, size))),
    )
}

fn extents_of(measured: impl Iterator<Item = (Cell, Size)>) -> MaxExtents {
    let mut extents = MaxExtents::default();
    for (cell, size) in measured {
        let height = extents.row_height.entry(cell.row).or_insert(size.height);
        *height = height.max(size.height);
        let width = extents.column_width.entry(cell.column).or_insert(size.width);
        *width = width.max(size.width);
    }
    extents
}

/// What `delete_and_reconnect` did.
#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    /// The cell the note occupied.
    pub cell: Cell,
    /// Edges that touched the note and were removed.
    pub removed_edges: Vec<Edge>,
    /// The edge added between the note's former left and right neighbours.
    pub bridge: Option<Edge>,
}

#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    grid: Grid,
    occupancy: OccupancyIndex,
    signal: GridSignal,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            grid: Grid::uniform(&config),
            config,
            occupancy: OccupancyIndex::new(),
            signal: GridSignal::new(),
        }
    }

    /// Engine with `items` already placed and the geometry built from them.
    pub fn from_items(config: LayoutConfig, items: &[PlacedItem]) -> Self {
        let mut engine = Self::new(config);
        engine.sync_items(items);
        engine
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Grid) + 'static) -> Subscription {
        self.signal.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.signal.unsubscribe(subscription)
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Replace the whole occupancy with `items` and rebuild.
    ///
    /// Items outside `±Cell::MAX_INDEX` are skipped. Two items claiming the
    /// same cell: the later one wins. Snapshots are checked for both before
    /// they get here (see `Snapshot::validate`).
    pub fn sync_items(&mut self, items: &[PlacedItem]) {
        self.occupancy.clear();
        for item in items {
            if !item.cell.in_bounds() {
                log::warn!("{} at {:?} is out of range, skipped", item.id, item.cell);
                continue;
            }
            if self.occupancy.is_occupied(item.cell) {
                log::warn!("{} overwrites an occupant at {:?}", item.id, item.cell);
            }
            self.occupancy.set(
                item.cell,
                Occupant {
                    id: item.id,
                    rect: Rect::default(),
                    size: item.size,
                },
            );
        }
        self.rebuild_geometry();
    }

    /// Recompute every row and column from the current occupants' measured
    /// sizes, refresh each occupant's cached rectangle, and notify.
    pub fn rebuild_geometry(&mut self) {
        let extents = extents_of(
            self.occupancy
                .iter()
                .filter_map(|(cell, o)| o.size.map(|size| (cell, size))),
        );
        let (rows, columns) = self.window();

        self.grid.rows = build_axis(rows, &extents.row_height, &self.config);
        self.grid.columns = build_axis(columns, &extents.column_width, &self.config);
        self.grid.max_row_height = extents.row_height;
        self.grid.max_column_width = extents.column_width;

        let grid = &self.grid;
        for (cell, occupant) in self.occupancy.iter_mut() {
            if let Some(rect) = grid.rect_of(cell) {
                occupant.rect = rect;
            }
        }

        log::debug!(
            "grid rebuilt: {} rows × {} columns, {} occupant(s)",
            self.grid.rows.len(),
            self.grid.columns.len(),
            self.occupancy.len()
        );
        self.signal.emit(&self.grid);
    }

    /// Row and column index ranges to materialize: the initial window,
    /// widened to cover every occupant plus the redundancy margin.
    fn window(&self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let count = self.config.window_count();
        let margin = self.config.margin();
        let base = (-count, count - 1);
        let widen = |(lo, hi): (i32, i32)| {
            base.0.min(lo.saturating_sub(margin))..=base.1.max(hi.saturating_add(margin))
        };
        match self.occupancy.bounds() {
            Some((rows, columns)) => (widen(rows), widen(columns)),
            None => (base.0..=base.1, base.0..=base.1),
        }
    }

    pub fn rect_of(&self, cell: Cell) -> Option<Rect> {
        self.grid.rect_of(cell)
    }

    pub fn find_rect_at(&self, point: Point) -> Option<(Rect, Cell)> {
        self.grid.cell_at(point)
    }

    pub fn find_gap_at(&self, point: Point) -> Option<Gap> {
        gap::find_gap_at(&self.grid, point, self.config.gap)
    }

    // ─── Occupancy queries ───────────────────────────────────────────────

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupancy.is_occupied(cell)
    }

    pub fn occupant_at(&self, cell: Cell) -> Option<NodeId> {
        self.occupancy.get(cell.row, cell.column).map(|o| o.id)
    }

    pub fn position_of(&self, id: NodeId) -> Option<Cell> {
        self.occupancy.position_of(id)
    }

    /// Rectangle of the cell `id` occupies.
    pub fn rect_of_item(&self, id: NodeId) -> Option<Rect> {
        self.occupancy.occupant_of(id).map(|(_, o)| o.rect)
    }

    pub fn find_adjacent(&self, id: NodeId, direction: Adjacent) -> Option<NodeId> {
        let cell = self.position_of(id)?;
        self.occupancy.find_adjacent(cell, direction).map(|o| o.id)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Put a new note in an empty cell.
    ///
    /// Returns the cell's rectangle, or `None` without changing anything if
    /// the cell is already occupied or out of range.
    pub fn place(&mut self, id: NodeId, cell: Cell, size: Option<Size>) -> Option<Rect> {
        if !cell.in_bounds() {
            log::warn!("place {id} at {cell:?} refused: out of range");
            return None;
        }
        if let Some(existing) = self.occupant_at(cell) {
            log::debug!("place {id} at {cell:?} refused: occupied by {existing}");
            return None;
        }
        self.occupancy.set(
            cell,
            Occupant {
                id,
                rect: Rect::default(),
                size,
            },
        );
        self.rebuild_geometry();
        self.rect_of(cell)
    }

    /// Record a note's new measured size. Returns `false` for unknown notes.
    pub fn resize(&mut self, id: NodeId, size: Size) -> bool {
        let Some(cell) = self.position_of(id) else {
            return false;
        };
        if let Some(occupant) = self.occupancy.get_mut(cell) {
            occupant.size = Some(size);
        }
        self.rebuild_geometry();
        true
    }

    /// Shift every note in `cell.row` at or right of `cell.column` one
    /// column to the right, leaving `cell` empty for the caller to fill.
    ///
    /// Notes are moved rightmost first, so each destination is already
    /// vacant when it is written. Returns the moved notes with their new
    /// cells, in that order, or `None` without moving anything if `cell` is
    /// out of range or the rightmost note would be pushed out of range.
    pub fn insert_and_shift(&mut self, cell: Cell) -> Option<Vec<(NodeId, Cell)>> {
        if !cell.in_bounds() {
            log::warn!("insert at {cell:?} refused: out of range");
            return None;
        }
        let to_shift: Vec<(Cell, Occupant)> = self
            .occupancy
            .row(cell.row)
            .filter(|(c, _)| c.column >= cell.column)
            .map(|(c, o)| (c, *o))
            .collect();
        if let Some((last, occupant)) = to_shift.last()
            && !last.shifted_right().in_bounds()
        {
            log::warn!("insert at {cell:?} refused: {} would leave the grid", occupant.id);
            return None;
        }

        let mut moved = Vec::with_capacity(to_shift.len());
        for (from, occupant) in to_shift.into_iter().rev() {
            let to = from.shifted_right();
            debug_assert!(!self.occupancy.is_occupied(to));
            self.occupancy.relocate(from, to, occupant);
            moved.push((occupant.id, to));
        }

        log::debug!("insert at {cell:?} shifted {} note(s)", moved.len());
        self.rebuild_geometry();
        Some(moved)
    }

    /// Remove a note from the grid.
    pub fn remove(&mut self, id: NodeId) -> Option<(Cell, Occupant)> {
        let cell = self.position_of(id)?;
        let occupant = self.occupancy.remove(cell)?;
        self.rebuild_geometry();
        Some((cell, occupant))
    }

    /// Remove a note, drop every edge touching it, and, if it sat between
    /// a left and right neighbour, join those two with an edge built by
    /// `connect`. Other notes keep their columns.
    pub fn delete_and_reconnect(
        &mut self,
        id: NodeId,
        edges: &mut EdgeSet,
        connect: impl FnOnce(NodeId, NodeId) -> Edge,
    ) -> Option<Deletion> {
        let left = self.find_adjacent(id, Adjacent::Left);
        let right = self.find_adjacent(id, Adjacent::Right);
        let (cell, _) = self.remove(id)?;
        let removed_edges = edges.remove_touching(id);

        let bridge = match (left, right) {
            (Some(left), Some(right)) if !edges.connects(left, right) => {
                let edge = connect(left, right);
                edges.insert(edge.clone()).then_some(edge)
            }
            _ => None,
        };

        log::debug!(
            "deleted {id} at {cell:?}: {} edge(s) removed, bridged: {}",
            removed_edges.len(),
            bridge.is_some()
        );
        Some(Deletion {
            cell,
            removed_edges,
            bridge,
        })
    }

    /// Move a note to `to`.
    ///
    /// Returns the new rectangle, or `None` if the note is unknown, `to` is
    /// out of range, or `to` belongs to another note.
    pub fn move_item(&mut self, id: NodeId, to: Cell) -> Option<Rect> {
        let (from, occupant) = self.occupancy.occupant_of(id).map(|(c, o)| (c, *o))?;
        if from == to {
            return Some(occupant.rect);
        }
        if !to.in_bounds() {
            log::warn!("move {id} to {to:?} refused: out of range");
            return None;
        }
        if let Some(other) = self.occupant_at(to) {
            log::debug!("move {id} to {to:?} refused: occupied by {other}");
            return None;
        }
        self.occupancy.relocate(from, to, occupant);
        self.rebuild_geometry();
        self.rect_of(to)
    }

    /// Placed notes in row-major order, as `(id, cell, size)`.
    pub fn items(&self) -> impl Iterator<Item = (NodeId, Cell, Option<Size>)> + '_ {
        self.occupancy.iter().map(|(cell, o)| (o.id, cell, o.size))
    }
}
