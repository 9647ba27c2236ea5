//! Hit testing: point → note lookup.
//!
//! A note is drawn at the top-left of its cell with its measured size
//! (or the full cell while unmeasured), so a point inside the cell but
//! outside a small note is not a hit.

use gn_core::id::NodeId;
use gn_core::layout::LayoutEngine;
use gn_core::model::{Point, Rect};

/// On-canvas bounds of a placed note.
pub fn node_bounds(engine: &LayoutEngine, id: NodeId) -> Option<Rect> {
    let (_, occupant) = engine.occupancy().occupant_of(id)?;
    let cell = occupant.rect;
    Some(match occupant.size {
        Some(size) => Rect::new(cell.x, cell.y, size.width, size.height),
        None => cell,
    })
}

/// The note under `point`, if any.
pub fn hit_test(engine: &LayoutEngine, point: Point) -> Option<NodeId> {
    // Only the cell under the point can hold a note covering it.
    let (_, cell) = engine.find_rect_at(point)?;
    let id = engine.occupant_at(cell)?;
    let hit = node_bounds(engine, id).is_some_and(|b| b.contains(point));
    log::trace!("hit test ({}, {}) → {id}: {hit}", point.x, point.y);
    hit.then_some(id)
}
