//! Insertion-point detection.
//!
//! The strip between two columns doubles as an "insert here" target. A
//! point is in a gap when it resolves to a cell and also falls inside the
//! band of width `gap` along that cell's trailing (right) edge.

use crate::model::{Gap, Grid, Point, Rect};

/// The gap band immediately to the right of the cell under `point`.
pub fn find_gap_at(grid: &Grid, point: Point, gap: f32) -> Option<Gap> {
    let (rect, cell) = grid.cell_at(point)?;
    let band = Rect::new(rect.right(), rect.y, gap, rect.height);
    if band.contains(point) {
        log::trace!("gap after {cell:?} at ({}, {})", point.x, point.y);
        Some(Gap { rect: band, cell })
    } else {
        None
    }
}
