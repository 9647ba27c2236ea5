//! SVG export of the background grid.

use crate::grid_lines::GridLine;
use gn_core::model::Rect;
use std::fmt::Write;

/// Screen-space pan/zoom of the canvas plus the container size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            zoom: 1.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// The canvas-space rectangle visible through this viewport.
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            -self.x / self.zoom,
            -self.y / self.zoom,
            self.width / self.zoom,
            self.height / self.zoom,
        )
    }

    pub fn view_box(&self) -> String {
        let r = self.visible_rect();
        format!("{} {} {} {}", r.x, r.y, r.width, r.height)
    }
}

/// Render the grid separators, plus the highlighted drop target when a
/// drag is in progress, as a standalone SVG document.
pub fn render_background_svg(
    lines: &GridLine,
    viewport: &Viewport,
    current: Option<Rect>,
) -> String {
    let mut svg = String::with_capacity(256 + lines.separator_path.len());
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" x="0" y="0" width="{}" height="{}" viewBox="{}">"#,
        viewport.width,
        viewport.height,
        viewport.view_box()
    );
    if let Some(r) = current {
        let _ = writeln!(
            svg,
            r##"  <rect class="current-cell" x="{}" y="{}" width="{}" height="{}" fill="#ef4444"/>"##,
            r.x, r.y, r.width, r.height
        );
    }
    let _ = writeln!(
        svg,
        r##"  <path class="grid-separator" d="{}" fill="none" stroke="#e5e7eb"/>"##,
        lines.separator_path
    );
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_lines::grid_lines;
    use gn_core::LayoutConfig;
    use gn_core::model::Grid;

    #[test]
    fn view_box_follows_pan_and_zoom() {
        let vp = Viewport {
            x: 100.0,
            y: -40.0,
            zoom: 2.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(vp.view_box(), "-50 20 400 300");
    }

    #[test]
    fn svg_contains_separators_and_highlight() {
        let lines = grid_lines(&Grid::uniform(&LayoutConfig::default()), None);
        let svg = render_background_svg(
            &lines,
            &Viewport::default(),
            Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="current-cell" x="0" y="0""#));
        assert!(svg.contains(r#"class="grid-separator""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn no_highlight_without_drag() {
        let lines = grid_lines(&Grid::default(), None);
        let svg = render_background_svg(&lines, &Viewport::default(), None);
        assert!(!svg.contains("current-cell"));
    }
}
