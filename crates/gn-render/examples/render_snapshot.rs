//! Render the background grid of a saved snapshot as SVG.
//!
//! Usage: `cargo run -p gn-render --example render_snapshot -- doc.json [out.svg]`

use gn_core::LayoutConfig;
use gn_core::snapshot::Snapshot;
use gn_render::{Viewport, grid_lines, render_background_svg};
use std::env;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(input) = args.get(1) else {
        eprintln!("usage: render_snapshot <snapshot.json> [out.svg]");
        return ExitCode::FAILURE;
    };

    let json = match fs::read_to_string(input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{input}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let snapshot = match Snapshot::from_json(&json) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{input}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let engine = snapshot.layout(LayoutConfig::default());
    let lines = grid_lines(engine.grid(), None);
    let viewport = Viewport {
        width: lines.max_x - lines.min_x,
        height: lines.max_y - lines.min_y,
        x: -lines.min_x,
        y: -lines.min_y,
        zoom: 1.0,
    };
    let svg = render_background_svg(&lines, &viewport, None);

    match args.get(2) {
        Some(out) => {
            if let Err(e) = fs::write(out, svg) {
                eprintln!("{out}: {e}");
                return ExitCode::FAILURE;
            }
            log::info!("wrote {out} ({} notes)", snapshot.nodes.len());
        }
        None => print!("{svg}"),
    }
    ExitCode::SUCCESS
}
