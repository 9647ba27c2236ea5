//! Document session: the context object behind one open canvas.
//!
//! A `Session` owns everything a document needs while it is open: the
//! layout engine (grid + occupancy), the edge list, note texts, connection
//! handles, and the highlighted selection. The view layer turns pointer
//! events into canvas points and calls the gesture methods here; every
//! method leaves the grid rebuilt before it returns.
//!
//! Notes are auto-wired along their row: a note dropped between two
//! neighbours splices itself into the chain `left → new → right`, and
//! deleting a note joins its neighbours back together.

use crate::handles::{HandleKind, HandleRegistry};
use gn_core::LayoutConfig;
use gn_core::edges::EdgeSet;
use gn_core::id::NodeId;
use gn_core::layout::LayoutEngine;
use gn_core::model::*;
use gn_core::notify::Subscription;
use gn_core::snapshot::{self, DocumentStore, Snapshot};
use gn_core::traverse::related_all_nodes;
use gn_render::{GridLine, grid_lines, hit_test};
use std::collections::{HashMap, HashSet};

pub struct Session {
    engine: LayoutEngine,
    edges: EdgeSet,
    texts: HashMap<NodeId, String>,
    handles: HandleRegistry,
    /// Notes highlighted as related to the current selection.
    related: HashSet<NodeId>,
}

impl Session {
    /// An empty document.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            engine: LayoutEngine::new(config),
            edges: EdgeSet::new(),
            texts: HashMap::new(),
            handles: HandleRegistry::new(),
            related: HashSet::new(),
        }
    }

    /// A fresh document with one note in the cell under the canvas origin.
    pub fn with_initial_note(config: LayoutConfig) -> Self {
        let mut session = Self::new(config);
        session.add_node_at(Point::new(0.0, 0.0));
        session
    }

    /// Rebuild a session from a snapshot: notes are placed, geometry is
    /// recomputed from their measured sizes, and edge handles re-registered.
    ///
    /// Fails if the snapshot does not pass `Snapshot::validate`.
    pub fn from_snapshot(config: LayoutConfig, snapshot: &Snapshot) -> snapshot::Result<Self> {
        snapshot.validate()?;
        let mut session = Self::new(config);
        session.engine.sync_items(&snapshot.nodes);
        for item in &snapshot.nodes {
            if let Some(text) = &item.text {
                session.texts.insert(item.id, text.clone());
            }
        }
        for edge in &snapshot.edges {
            if let Some(h) = &edge.source_handle {
                session.handles.add(edge.source, HandleKind::Source, Some(h));
            }
            if let Some(h) = &edge.target_handle {
                session.handles.add(edge.target, HandleKind::Target, Some(h));
            }
        }
        session.edges = snapshot.edges.clone();
        Ok(session)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self
                .engine
                .items()
                .map(|(id, cell, size)| PlacedItem {
                    id,
                    cell,
                    text: self.texts.get(&id).cloned(),
                    size,
                })
                .collect(),
            edges: self.edges.clone(),
        }
    }

    pub fn save(&self, store: &mut dyn DocumentStore, document_id: &str) -> snapshot::Result<()> {
        snapshot::save_document(store, document_id, &self.snapshot())
    }

    pub fn load(
        store: &dyn DocumentStore,
        document_id: &str,
        config: LayoutConfig,
    ) -> snapshot::Result<Self> {
        let snapshot = snapshot::load_document(store, document_id)?;
        log::debug!("loaded {document_id}: {} note(s)", snapshot.nodes.len());
        Self::from_snapshot(config, &snapshot)
    }

    /// Drop every note, edge and handle.
    pub fn reset(&mut self) {
        self.engine.sync_items(&[]);
        self.edges.clear();
        self.texts.clear();
        self.handles.clear();
        self.related.clear();
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.texts.get(&id).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.engine.occupancy().len()
    }

    pub fn grid_lines(&self, viewport: Option<Rect>) -> GridLine {
        grid_lines(self.engine.grid(), viewport)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Grid) + 'static) -> Subscription {
        self.engine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.engine.unsubscribe(subscription)
    }

    // ─── Notes ───────────────────────────────────────────────────────────

    /// Double-click: create a note in the cell under `point`.
    ///
    /// Nothing happens when the point is on an existing note, outside the
    /// grid, or in an occupied cell.
    pub fn add_node_at(&mut self, point: Point) -> Option<NodeId> {
        if hit_test(&self.engine, point).is_some() {
            return None;
        }
        let (_, cell) = self.engine.find_rect_at(point)?;
        self.add_node_in_cell(cell)
    }

    /// Create a note in `cell` and wire it to its row neighbours.
    pub fn add_node_in_cell(&mut self, cell: Cell) -> Option<NodeId> {
        let id = NodeId::next_after(self.engine.items().map(|(id, _, _)| id));
        self.engine.place(id, cell, None)?;

        let left = self.engine.find_adjacent(id, Adjacent::Left);
        let right = self.engine.find_adjacent(id, Adjacent::Right);

        if let (Some(left), Some(right)) = (left, right)
            && let Some(existing) = self.edges.find(left, right).map(|e| e.id)
        {
            self.delete_edge(existing);
        }
        if let Some(left) = left {
            self.connect(left, id);
        }
        if let Some(right) = right {
            self.connect(id, right);
        }

        log::debug!("added {id} at {cell:?} (left: {left:?}, right: {right:?})");
        Some(id)
    }

    /// Make room at `cell` by shifting the rest of its row right, then
    /// create a note there.
    pub fn insert_node(&mut self, cell: Cell) -> Option<NodeId> {
        self.engine.rect_of(cell)?;
        self.engine.insert_and_shift(cell)?;
        self.add_node_in_cell(cell)
    }

    /// Click on a gap affordance: insert a note right after the cell the
    /// gap follows.
    pub fn insert_at_gap(&mut self, point: Point) -> Option<NodeId> {
        let gap = self.engine.find_gap_at(point)?;
        self.insert_node(gap.cell.shifted_right())
    }

    /// Delete a note with its edges, joining its row neighbours.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Self {
            engine,
            edges,
            handles,
            ..
        } = self;
        let Some(deletion) =
            engine.delete_and_reconnect(id, edges, |left, right| connect_edge(handles, left, right))
        else {
            return false;
        };
        for edge in &deletion.removed_edges {
            release_handles(handles, edge);
        }
        self.handles.remove_node(id);
        self.texts.remove(&id);
        self.related.remove(&id);
        true
    }

    /// Drag stop: move a note to the cell under `point`.
    ///
    /// Returns the note's new rectangle, or `None` if the point is outside
    /// the grid or the cell belongs to another note.
    pub fn move_node(&mut self, id: NodeId, point: Point) -> Option<Rect> {
        let (_, cell) = self.engine.find_rect_at(point)?;
        self.engine.move_item(id, cell)
    }

    /// Drag feedback: the cell rectangle under the pointer.
    pub fn drag_target(&self, point: Point) -> Option<Rect> {
        self.engine.find_rect_at(point).map(|(rect, _)| rect)
    }

    /// Hover feedback: the insertion gap under the pointer.
    pub fn hover_gap(&self, point: Point) -> Option<Gap> {
        self.engine.find_gap_at(point)
    }

    pub fn update_text(&mut self, id: NodeId, text: &str) -> bool {
        if self.engine.position_of(id).is_none() {
            return false;
        }
        self.texts.insert(id, text.to_string());
        true
    }

    /// The view measured a note at a new size.
    pub fn resize_node(&mut self, id: NodeId, width: f32, height: f32) -> bool {
        self.engine.resize(id, Size::new(width, height))
    }

    // ─── Edges ───────────────────────────────────────────────────────────

    /// Connect two placed notes through fresh handles. Returns the edge ID.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Option<NodeId> {
        if self.engine.position_of(source).is_none() || self.engine.position_of(target).is_none()
        {
            log::warn!("connect {source} → {target}: unknown note");
            return None;
        }
        let edge = connect_edge(&mut self.handles, source, target);
        let id = edge.id;
        self.edges.insert(edge);
        Some(id)
    }

    /// A connection dragged from `source` and dropped on the canvas.
    ///
    /// Dropping on an empty cell creates a note there (wired into its row);
    /// if that row is not the source's row, the source is connected to the
    /// new note as well. Dropping on an occupied cell does nothing.
    pub fn connect_to_empty_cell(&mut self, source: NodeId, point: Point) -> Option<NodeId> {
        let source_cell = self.engine.position_of(source)?;
        let (_, cell) = self.engine.find_rect_at(point)?;
        if self.engine.is_occupied(cell) {
            return None;
        }
        let target = self.add_node_in_cell(cell)?;
        if source_cell.row != cell.row {
            self.connect(source, target);
        }
        Some(target)
    }

    pub fn delete_edge(&mut self, id: NodeId) -> bool {
        match self.edges.remove(id) {
            Some(edge) => {
                release_handles(&mut self.handles, &edge);
                true
            }
            None => false,
        }
    }

    // ─── Highlighting ────────────────────────────────────────────────────

    /// Highlight every note upstream or downstream of `selection`.
    pub fn highlight(&mut self, selection: &[NodeId]) {
        self.related = related_all_nodes(selection, &self.edges)
            .into_iter()
            .collect();
    }

    pub fn clear_highlight(&mut self) {
        self.related.clear();
    }

    pub fn is_highlighted(&self, id: NodeId) -> bool {
        self.related.contains(&id)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.related.iter().copied()
    }
}

fn connect_edge(handles: &mut HandleRegistry, source: NodeId, target: NodeId) -> Edge {
    let source_handle = handles.add(source, HandleKind::Source, None);
    let target_handle = handles.add(target, HandleKind::Target, None);
    Edge::between_handles(source, &source_handle, target, &target_handle)
}

fn release_handles(handles: &mut HandleRegistry, edge: &Edge) {
    if let Some(h) = &edge.source_handle {
        handles.remove(edge.source, h);
    }
    if let Some(h) = &edge.target_handle {
        handles.remove(edge.target, h);
    }
}
