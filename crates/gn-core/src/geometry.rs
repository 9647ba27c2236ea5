//! Grid geometry: translation between cell addresses and canvas rectangles.
//!
//! Rows and columns are packed along their axis with a fixed gap between
//! them. A cell owns the half-open span `[origin, origin + length + gap)` on
//! each axis, so the gap strip after a cell still resolves to that cell.

use crate::config::LayoutConfig;
use crate::model::*;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

impl Grid {
    /// The initial grid: `-initial_count..initial_count` on both axes, every
    /// line at the default length, with index 0 at origin 0.
    pub fn uniform(config: &LayoutConfig) -> Self {
        let count = config.window_count();
        let range = -count..=count - 1;
        let empty = BTreeMap::new();
        Self {
            rows: build_axis(range.clone(), &empty, config),
            columns: build_axis(range, &empty, config),
            max_row_height: BTreeMap::new(),
            max_column_width: BTreeMap::new(),
        }
    }

    pub fn lines(&self, axis: Axis) -> &BTreeMap<i32, LineDef> {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    /// Rectangle of a materialized cell, or `None` if its row or column is
    /// outside the materialized window.
    pub fn rect_of(&self, cell: Cell) -> Option<Rect> {
        let row = self.rows.get(&cell.row)?;
        let column = self.columns.get(&cell.column)?;
        Some(Rect::new(column.origin, row.origin, column.length, row.length))
    }

    /// The cell enclosing `point`, with its rectangle.
    ///
    /// Returns `None` when the point lies before the first row or column.
    /// Points past the last line resolve to that last line.
    pub fn cell_at(&self, point: Point) -> Option<(Rect, Cell)> {
        let row = enclosing(&self.rows, point.y)?;
        let column = enclosing(&self.columns, point.x)?;
        Some((
            Rect::new(column.origin, row.origin, column.length, row.length),
            Cell::new(row.index, column.index),
        ))
    }

    /// Whether every pair of consecutive lines on `axis` is separated by at
    /// least `gap`.
    pub fn is_packed(&self, axis: Axis, gap: f32) -> bool {
        let lines: Vec<&LineDef> = self.lines(axis).values().collect();
        lines
            .windows(2)
            .all(|w| w[1].origin >= w[0].origin + w[0].length + gap - 1e-3)
    }
}

/// Last line whose origin is at or before `coord`.
fn enclosing(lines: &BTreeMap<i32, LineDef>, coord: f32) -> Option<&LineDef> {
    lines.values().take_while(|line| line.origin <= coord).last()
}

/// Lay out one axis over `range`: each line is as long as its recorded
/// extent (or the default length) and starts `gap` after the previous one.
///
/// Index 0 is anchored at origin 0 so that growing the window does not move
/// existing lines. If the window does not include 0, its first line sits
/// where a uniform grid would put it.
pub fn build_axis(
    range: RangeInclusive<i32>,
    extents: &BTreeMap<i32, f32>,
    config: &LayoutConfig,
) -> BTreeMap<i32, LineDef> {
    let mut lines = BTreeMap::new();
    let mut cursor = 0.0f32;
    for index in range.clone() {
        let length = extents
            .get(&index)
            .copied()
            .unwrap_or(config.default_length);
        lines.insert(
            index,
            LineDef {
                index,
                origin: cursor,
                length,
            },
        );
        cursor += length + config.gap;
    }

    let shift = match lines.get(&0) {
        Some(zero) => -zero.origin,
        None => *range.start() as f32 * (config.default_length + config.gap),
    };
    if shift != 0.0 {
        for line in lines.values_mut() {
            line.origin += shift;
        }
    }
    lines
}
