//! Grid → separator lines and cell rectangles for the background layer.
//!
//! Every row and column contributes two coordinates, its leading edge and
//! its trailing edge, so the gap strips between cells are drawn as
//! double lines.

use gn_core::model::{Grid, LineDef, Rect};
use kurbo::BezPath;

/// Background geometry for one materialized grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLine {
    /// Column edges, left to right.
    pub x_list: Vec<f32>,
    /// Row edges, top to bottom.
    pub y_list: Vec<f32>,
    /// SVG path data with one full-height line per x and one full-width
    /// line per y.
    pub separator_path: String,
    /// Cell rectangles, row-major; limited to the viewport when one is given.
    pub rects: Vec<Rect>,
    /// SVG path data outlining `rects`.
    pub rects_path: String,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Compute separator lines and cell rectangles for `grid`.
///
/// `viewport` only culls `rects`; lines always span the whole grid.
pub fn grid_lines(grid: &Grid, viewport: Option<Rect>) -> GridLine {
    let x_list: Vec<f32> = grid
        .columns
        .values()
        .flat_map(|c| [c.origin, c.origin + c.length])
        .collect();
    let y_list: Vec<f32> = grid
        .rows
        .values()
        .flat_map(|r| [r.origin, r.origin + r.length])
        .collect();

    let (min_x, max_x) = extent(&x_list);
    let (min_y, max_y) = extent(&y_list);

    let mut separators = BezPath::new();
    for &x in &x_list {
        separators.move_to((x as f64, min_y as f64));
        separators.line_to((x as f64, max_y as f64));
    }
    for &y in &y_list {
        separators.move_to((min_x as f64, y as f64));
        separators.line_to((max_x as f64, y as f64));
    }

    // Cull each axis on its own; only visible rows × visible columns are
    // ever paired up.
    let rows: Vec<&LineDef> = grid
        .rows
        .values()
        .filter(|r| viewport.is_none_or(|v| overlaps(r, v.y, v.bottom())))
        .collect();
    let columns: Vec<&LineDef> = grid
        .columns
        .values()
        .filter(|c| viewport.is_none_or(|v| overlaps(c, v.x, v.right())))
        .collect();

    let mut rects = Vec::with_capacity(rows.len() * columns.len());
    let mut outlines = BezPath::new();
    for row in &rows {
        for column in &columns {
            let rect = Rect::new(column.origin, row.origin, column.length, row.length);
            outline(&mut outlines, &rect);
            rects.push(rect);
        }
    }

    log::trace!(
        "grid lines: {} x, {} y, {} rect(s)",
        x_list.len(),
        y_list.len(),
        rects.len()
    );

    GridLine {
        separator_path: separators.to_svg(),
        rects_path: outlines.to_svg(),
        x_list,
        y_list,
        rects,
        min_x,
        max_x,
        min_y,
        max_y,
    }
}

/// Open-interval overlap, matching `Rect::intersects`.
fn overlaps(line: &LineDef, start: f32, end: f32) -> bool {
    line.origin < end && line.origin + line.length > start
}

/// First and last coordinate (lists are already sorted).
fn extent(list: &[f32]) -> (f32, f32) {
    match (list.first(), list.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (0.0, 0.0),
    }
}

fn outline(path: &mut BezPath, rect: &Rect) {
    let (x0, y0) = (rect.x as f64, rect.y as f64);
    let (x1, y1) = (rect.right() as f64, rect.bottom() as f64);
    path.move_to((x0, y0));
    path.line_to((x1, y0));
    path.line_to((x1, y1));
    path.line_to((x0, y1));
    path.close_path();
}
