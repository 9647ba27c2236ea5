//! WASM bridge for Grid Notes: exposes the editor session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page converts pointer
//! events to canvas coordinates (see `GridCanvas::to_canvas`) and calls the
//! gesture methods; note IDs cross the boundary as strings, with `""`
//! meaning "none", and structured results as JSON.

mod storage;

use gn_core::LayoutConfig;
use gn_core::id::NodeId;
use gn_core::model::{Grid, Point, Rect};
use gn_core::snapshot::{DocumentStore, Snapshot, SnapshotError};
use gn_editor::Session;
use gn_render::{Viewport, render_background_svg};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use storage::LocalStorage;
use wasm_bindgen::prelude::*;

type Listeners = Rc<RefCell<Vec<(u32, Function)>>>;

/// The main WASM-facing canvas controller.
///
/// Owns the open document's session plus the view state the page needs to
/// draw the background: pan/zoom and the cell highlighted under a drag.
#[wasm_bindgen]
pub struct GridCanvas {
    session: Session,
    config: LayoutConfig,
    viewport: Viewport,
    listeners: Listeners,
    next_listener: u32,
    drop_target: Option<Rect>,
    document_id: Option<String>,
}

#[wasm_bindgen]
impl GridCanvas {
    /// A new canvas holding one note at the origin.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(LayoutConfig::default(), width, height)
    }

    /// Like `new`, with layout settings from JSON (`{"gap":16,...}`).
    /// Missing fields keep their defaults; unparsable JSON uses all defaults.
    pub fn from_config_json(config: &str, width: f32, height: f32) -> Self {
        let config = serde_json::from_str(config).unwrap_or_else(|e| {
            log::warn!("bad layout config, using defaults: {e}");
            LayoutConfig::default()
        });
        Self::with_config(config, width, height)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, x: f32, y: f32, zoom: f32, width: f32, height: f32) {
        self.viewport = Viewport {
            x,
            y,
            zoom: if zoom > 0.0 { zoom } else { 1.0 },
            width,
            height,
        };
    }

    /// Screen → canvas coordinates under the current pan and zoom.
    /// Returns `[x, y]`.
    pub fn to_canvas(&self, screen_x: f32, screen_y: f32) -> Vec<f32> {
        vec![
            (screen_x - self.viewport.x) / self.viewport.zoom,
            (screen_y - self.viewport.y) / self.viewport.zoom,
        ]
    }

    /// Background SVG for the current grid, viewport and drag highlight.
    pub fn background_svg(&self) -> String {
        let lines = self.session.grid_lines(Some(self.viewport.visible_rect()));
        render_background_svg(&lines, &self.viewport, self.drop_target)
    }

    /// Grid lines and visible cell rectangles as JSON.
    pub fn grid_lines_json(&self) -> String {
        let lines = self.session.grid_lines(Some(self.viewport.visible_rect()));
        serde_json::json!({
            "xList": lines.x_list,
            "yList": lines.y_list,
            "path": lines.separator_path,
            "rects": lines.rects,
            "rectsPath": lines.rects_path,
            "minX": lines.min_x,
            "maxX": lines.max_x,
            "minY": lines.min_y,
            "maxY": lines.max_y,
        })
        .to_string()
    }

    pub fn grid_json(&self) -> String {
        to_json(self.session.grid())
    }

    /// A note's connection handles as JSON, for laying them out on its
    /// sides: `[{"id":"source_1","kind":"source","side":"right"}, ...]`.
    pub fn handles_json(&self, id: &str) -> String {
        let handles: Vec<serde_json::Value> = self
            .session
            .handles()
            .handles(NodeId::intern(id))
            .iter()
            .map(|h| serde_json::json!({ "id": h.id, "kind": h.kind, "side": h.side() }))
            .collect();
        to_json(&handles)
    }

    /// The rectangle of a placed note's cell as JSON, or `null`.
    pub fn node_rect_json(&self, id: &str) -> String {
        to_json(&self.session.engine().rect_of_item(NodeId::intern(id)))
    }

    // ─── Subscriptions ───────────────────────────────────────────────────

    /// Call `callback(gridJson)` after every grid rebuild. Calls are queued
    /// as microtasks, so the callback may use this canvas freely.
    pub fn subscribe(&mut self, callback: Function) -> u32 {
        self.next_listener += 1;
        self.listeners
            .borrow_mut()
            .push((self.next_listener, callback));
        self.next_listener
    }

    pub fn unsubscribe(&mut self, token: u32) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(t, _)| *t != token);
        listeners.len() != before
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Double-click on the canvas. Returns the new note's ID, or `""`.
    pub fn double_click(&mut self, x: f32, y: f32) -> String {
        id_or_empty(self.session.add_node_at(Point::new(x, y)))
    }

    /// Pointer moved during a note drag. Returns the target cell rect as
    /// JSON, or `null` off-grid.
    pub fn drag_over(&mut self, x: f32, y: f32) -> String {
        self.drop_target = self.session.drag_target(Point::new(x, y));
        to_json(&self.drop_target)
    }

    /// Drag stopped. Returns whether the note moved.
    pub fn drop_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.drop_target = None;
        self.session
            .move_node(NodeId::intern(id), Point::new(x, y))
            .is_some()
    }

    /// The gap under the pointer as `{rect, cell}` JSON, or `null`.
    pub fn hover_gap(&self, x: f32, y: f32) -> String {
        to_json(&self.session.hover_gap(Point::new(x, y)))
    }

    /// Click on a gap. Returns the inserted note's ID, or `""`.
    pub fn insert_at_gap(&mut self, x: f32, y: f32) -> String {
        id_or_empty(self.session.insert_at_gap(Point::new(x, y)))
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        self.session.delete_node(NodeId::intern(id))
    }

    /// Connect two notes. Returns the edge ID, or `""`.
    pub fn connect(&mut self, source: &str, target: &str) -> String {
        id_or_empty(
            self.session
                .connect(NodeId::intern(source), NodeId::intern(target)),
        )
    }

    /// A connection dropped on the canvas. Returns the created note's ID,
    /// or `""` when the cell is occupied or off-grid.
    pub fn connect_to_empty_cell(&mut self, source: &str, x: f32, y: f32) -> String {
        id_or_empty(
            self.session
                .connect_to_empty_cell(NodeId::intern(source), Point::new(x, y)),
        )
    }

    pub fn delete_edge(&mut self, id: &str) -> bool {
        self.session.delete_edge(NodeId::intern(id))
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.session.update_text(NodeId::intern(id), text)
    }

    /// The page measured a note.
    pub fn resize_node(&mut self, id: &str, width: f32, height: f32) -> bool {
        self.session.resize_node(NodeId::intern(id), width, height)
    }

    /// Highlight everything related to the selected IDs (a JSON array).
    pub fn highlight(&mut self, ids_json: &str) -> bool {
        match serde_json::from_str::<Vec<String>>(ids_json) {
            Ok(ids) => {
                let ids: Vec<NodeId> = ids.iter().map(|s| NodeId::intern(s)).collect();
                self.session.highlight(&ids);
                true
            }
            Err(e) => {
                log::warn!("highlight: {e}");
                false
            }
        }
    }

    pub fn clear_highlight(&mut self) {
        self.session.clear_highlight();
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.session.is_highlighted(NodeId::intern(id))
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// The whole document as snapshot JSON.
    pub fn snapshot_json(&self) -> String {
        self.session
            .snapshot()
            .to_json()
            .unwrap_or_else(|e| {
                log::error!("snapshot: {e}");
                String::new()
            })
    }

    /// Replace the document with snapshot JSON. Returns `false` (leaving
    /// the document unchanged) if the JSON is malformed or inconsistent.
    pub fn load_snapshot_json(&mut self, json: &str) -> bool {
        let session = Snapshot::from_json(json)
            .and_then(|snapshot| Session::from_snapshot(self.config, &snapshot));
        match session {
            Ok(session) => {
                self.replace_session(session);
                true
            }
            Err(e) => {
                log::warn!("load snapshot: {e}");
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.drop_target = None;
        self.session.reset();
    }

    pub fn document_id(&self) -> String {
        self.document_id.clone().unwrap_or_default()
    }

    /// Save to `localStorage` under the open document's ID.
    pub fn save(&self) -> Result<(), JsValue> {
        let id = self
            .document_id
            .as_deref()
            .ok_or_else(|| JsValue::from_str("no document open"))?;
        let mut store = LocalStorage::open().map_err(to_js)?;
        self.session.save(&mut store, id).map_err(to_js)
    }

    /// Open a document from `localStorage`.
    pub fn open(&mut self, id: &str) -> Result<(), JsValue> {
        let store = LocalStorage::open().map_err(to_js)?;
        let session = Session::load(&store, id, self.config).map_err(to_js)?;
        self.replace_session(session);
        self.document_id = Some(id.to_string());
        Ok(())
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl GridCanvas {
    fn with_config(config: LayoutConfig, width: f32, height: f32) -> Self {
        console_setup();
        let listeners = Listeners::default();
        let mut session = Session::with_initial_note(config);
        attach(&mut session, &listeners);
        Self {
            session,
            config,
            viewport: Viewport {
                width,
                height,
                ..Viewport::default()
            },
            listeners,
            next_listener: 0,
            drop_target: None,
            document_id: None,
        }
    }

    fn replace_session(&mut self, mut session: Session) {
        attach(&mut session, &self.listeners);
        self.session = session;
        self.drop_target = None;
    }
}

/// Forward grid rebuilds of `session` to the page's listeners.
fn attach(session: &mut Session, listeners: &Listeners) {
    let listeners = Rc::clone(listeners);
    session.subscribe(move |grid| notify(&listeners, grid));
}

fn notify(listeners: &Listeners, grid: &Grid) {
    let listeners = listeners.borrow();
    if listeners.is_empty() {
        return;
    }
    let payload = JsValue::from_str(&to_json(grid));
    let Some(window) = web_sys::window() else {
        log::warn!("no window; {} grid listener(s) skipped", listeners.len());
        return;
    };
    for (_, callback) in listeners.iter() {
        // Queued rather than called: the page may call back into the
        // canvas, which is still borrowed here.
        window.queue_microtask(&callback.bind1(&JsValue::NULL, &payload).unchecked_into::<Function>());
    }
}

fn id_or_empty(id: Option<NodeId>) -> String {
    id.map(|id| id.as_str().to_string()).unwrap_or_default()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialize: {e}");
        "null".to_string()
    })
}

fn to_js(err: SnapshotError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Console logging and panic hook ──────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Grid Notes WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone document registry functions ──────────────────────────────

/// Registered documents as a JSON array of `{id, title}`.
#[wasm_bindgen]
pub fn list_documents() -> Result<String, JsValue> {
    let store = LocalStorage::open().map_err(to_js)?;
    let docs = gn_editor::list_documents(&store).map_err(to_js)?;
    Ok(to_json(&docs))
}

/// Register a new empty document. Returns its `{id, title}` JSON.
#[wasm_bindgen]
pub fn create_document(title: Option<String>) -> Result<String, JsValue> {
    let mut store = LocalStorage::open().map_err(to_js)?;
    let meta = gn_editor::create_document(&mut store, title.as_deref()).map_err(to_js)?;
    Ok(to_json(&meta))
}

#[wasm_bindgen]
pub fn delete_document(id: &str) -> Result<(), JsValue> {
    let mut store = LocalStorage::open().map_err(to_js)?;
    gn_editor::delete_document(&mut store, id).map_err(to_js)
}

#[wasm_bindgen]
pub fn rename_document(id: &str, title: &str) -> Result<(), JsValue> {
    let mut store = LocalStorage::open().map_err(to_js)?;
    gn_editor::rename_document(&mut store, id, title).map_err(to_js)
}

/// Whether a stored document exists.
#[wasm_bindgen]
pub fn has_document(id: &str) -> Result<bool, JsValue> {
    let store = LocalStorage::open().map_err(to_js)?;
    let key = gn_core::snapshot::document_key(id);
    Ok(store.get(&key).map_err(to_js)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::model::Cell;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_canvas_has_one_note_at_origin() {
        let canvas = GridCanvas::new(800.0, 600.0);
        assert_eq!(canvas.session.node_count(), 1);
        assert_eq!(
            canvas.session.engine().occupant_at(Cell::new(0, 0)),
            Some(NodeId::intern("1"))
        );
    }

    #[test]
    fn double_click_on_empty_cell_returns_new_id() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        assert_eq!(canvas.double_click(150.0, 50.0), "2");
        // On the new note: nothing.
        assert_eq!(canvas.double_click(150.0, 50.0), "");
        assert!(canvas.session.edges().connects(NodeId::intern("1"), NodeId::intern("2")));
    }

    #[test]
    fn drag_highlights_then_drop_clears() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        let json = canvas.drag_over(250.0, 250.0);
        assert!(json.contains("\"x\":220"));
        assert!(canvas.background_svg().contains("current-cell"));

        assert!(canvas.drop_node("1", 250.0, 250.0));
        assert!(!canvas.background_svg().contains("current-cell"));
        assert_eq!(canvas.drag_over(-99999.0, 0.0), "null");
    }

    #[test]
    fn gap_click_inserts_after_the_cell() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        canvas.double_click(150.0, 50.0);
        assert_ne!(canvas.hover_gap(105.0, 50.0), "null");
        let id = canvas.insert_at_gap(105.0, 50.0);
        assert_eq!(id, "3");
        assert_eq!(
            canvas.session.engine().position_of(NodeId::intern("2")),
            Some(Cell::new(0, 2))
        );
    }

    #[test]
    fn snapshot_json_round_trips_and_rejects_garbage() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        canvas.double_click(150.0, 50.0);
        canvas.set_text("2", "hello");
        let json = canvas.snapshot_json();

        let mut other = GridCanvas::new(800.0, 600.0);
        assert!(other.load_snapshot_json(&json));
        assert_eq!(other.snapshot_json(), json);
        assert!(!other.load_snapshot_json("{oops"));
        assert_eq!(other.snapshot_json(), json);
    }

    #[test]
    fn inconsistent_snapshot_json_is_refused() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        let before = canvas.snapshot_json();
        let shared_cell =
            r#"{"nodes":[{"id":"1","row":0,"column":0},{"id":"2","row":0,"column":0}],"edges":[]}"#;
        assert!(!canvas.load_snapshot_json(shared_cell));
        let far = r#"{"nodes":[{"id":"1","row":2147483647,"column":0}],"edges":[]}"#;
        assert!(!canvas.load_snapshot_json(far));
        assert_eq!(canvas.snapshot_json(), before);
    }

    #[test]
    fn handles_report_their_side() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        canvas.double_click(150.0, 50.0);
        assert_eq!(
            canvas.handles_json("1"),
            r#"[{"id":"source_1","kind":"source","side":"right"}]"#
        );
        assert_eq!(
            canvas.handles_json("2"),
            r#"[{"id":"target_1","kind":"target","side":"left"}]"#
        );
        assert_eq!(canvas.handles_json("9"), "[]");
    }

    #[test]
    fn highlight_accepts_json_ids() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        canvas.double_click(150.0, 50.0);
        assert!(canvas.highlight(r#"["2"]"#));
        assert!(canvas.is_highlighted("1"));
        assert!(!canvas.highlight("nope"));
    }

    #[test]
    fn screen_points_map_through_pan_and_zoom() {
        let mut canvas = GridCanvas::new(800.0, 600.0);
        canvas.set_viewport(100.0, 20.0, 2.0, 800.0, 600.0);
        assert_eq!(canvas.to_canvas(300.0, 220.0), vec![100.0, 100.0]);
    }
}
