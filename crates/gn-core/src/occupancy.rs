//! Sparse occupancy index: which note sits in which cell.
//!
//! Cells are kept in a `BTreeMap` ordered row-major, so a row's occupants are
//! one contiguous range sorted by column. A reverse map gives O(1) lookup of
//! an item's current cell.

use crate::id::NodeId;
use crate::model::{Adjacent, Cell, Rect, Size};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Included};

/// An occupied cell's record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    pub id: NodeId,
    /// Rectangle of the cell at the time of the last rebuild.
    pub rect: Rect,
    /// Measured size reported by the view, if any.
    pub size: Option<Size>,
}

impl Occupant {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            rect: Rect::default(),
            size: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    cells: BTreeMap<Cell, Occupant>,
    positions: HashMap<NodeId, Cell>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
    }

    /// Place `occupant` at `cell`, replacing whatever was there.
    ///
    /// An item occupies one cell at a time: if it was registered elsewhere,
    /// that entry is dropped.
    pub fn set(&mut self, cell: Cell, occupant: Occupant) {
        if let Some(previous) = self.positions.insert(occupant.id, cell)
            && previous != cell
        {
            self.cells.remove(&previous);
        }
        if let Some(evicted) = self.cells.insert(cell, occupant)
            && evicted.id != occupant.id
        {
            self.positions.remove(&evicted.id);
        }
    }

    pub fn get(&self, row: i32, column: i32) -> Option<&Occupant> {
        self.cells.get(&Cell::new(row, column))
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut Occupant> {
        self.cells.get_mut(&cell)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<Occupant> {
        let occupant = self.cells.remove(&cell)?;
        self.positions.remove(&occupant.id);
        Some(occupant)
    }

    /// `remove(from)` followed by `set(to, occupant)`.
    pub fn relocate(&mut self, from: Cell, to: Cell, occupant: Occupant) {
        self.remove(from);
        self.set(to, occupant);
    }

    /// Current cell of an item.
    pub fn position_of(&self, id: NodeId) -> Option<Cell> {
        self.positions.get(&id).copied()
    }

    pub fn occupant_of(&self, id: NodeId) -> Option<(Cell, &Occupant)> {
        let cell = self.position_of(id)?;
        self.cells.get(&cell).map(|o| (cell, o))
    }

    /// All occupants in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Occupant)> {
        self.cells.iter().map(|(c, o)| (*c, o))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Cell, &mut Occupant)> {
        self.cells.iter_mut().map(|(c, o)| (*c, o))
    }

    /// Occupants of `row`, sorted by column ascending.
    pub fn row(&self, row: i32) -> impl DoubleEndedIterator<Item = (Cell, &Occupant)> {
        self.cells
            .range(Cell::new(row, i32::MIN)..=Cell::new(row, i32::MAX))
            .map(|(c, o)| (*c, o))
    }

    /// The nearest occupant to the left or right of `cell` within its row.
    ///
    /// Returns `None` if `cell` itself is unoccupied or has no neighbour on
    /// that side. Columns are unique keys, so there is never a tie.
    pub fn find_adjacent(&self, cell: Cell, direction: Adjacent) -> Option<&Occupant> {
        if !self.is_occupied(cell) {
            return None;
        }
        match direction {
            Adjacent::Left => self
                .cells
                .range(Cell::new(cell.row, i32::MIN)..cell)
                .next_back()
                .map(|(_, o)| o),
            Adjacent::Right => self
                .cells
                .range((Excluded(cell), Included(Cell::new(cell.row, i32::MAX))))
                .next()
                .map(|(_, o)| o),
        }
    }

    /// Smallest and largest occupied row and column, if any cell is occupied.
    pub fn bounds(&self) -> Option<((i32, i32), (i32, i32))> {
        let mut cells = self.cells.keys();
        let first = cells.next()?;
        let mut rows = (first.row, first.row);
        let mut columns = (first.column, first.column);
        for cell in cells {
            rows.1 = rows.1.max(cell.row);
            columns.0 = columns.0.min(cell.column);
            columns.1 = columns.1.max(cell.column);
        }
        Some((rows, columns))
    }
}
