pub mod grid_lines;
pub mod hit;
pub mod svg;

pub use grid_lines::{GridLine, grid_lines};
pub use hit::{hit_test, node_bounds};
pub use svg::{Viewport, render_background_svg};
