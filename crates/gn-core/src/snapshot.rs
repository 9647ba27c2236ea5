//! Document snapshots and key-value persistence.
//!
//! A snapshot holds what is needed to rebuild a document: every note with
//! its cell, text and measured size, plus the edge list. Geometry is never
//! stored; it is recomputed from the notes on load.

use crate::config::LayoutConfig;
use crate::edges::EdgeSet;
use crate::id::NodeId;
use crate::layout::LayoutEngine;
use crate::model::{Cell, PlacedItem};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("note {id} at {cell:?} is outside the grid")]
    OutOfRange { id: NodeId, cell: Cell },

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),

    #[error("storage error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<PlacedItem>,
    pub edges: EdgeSet,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that the snapshot describes one consistent document:
    ///
    /// - every cell lies within `±Cell::MAX_INDEX` (`OutOfRange`);
    /// - note IDs, cells and edge IDs are unique (`Inconsistent`);
    /// - every edge connects two notes of the snapshot (`Inconsistent`).
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        let mut cells = HashSet::with_capacity(self.nodes.len());
        for item in &self.nodes {
            if !item.cell.in_bounds() {
                return Err(SnapshotError::OutOfRange {
                    id: item.id,
                    cell: item.cell,
                });
            }
            if !ids.insert(item.id) {
                return Err(inconsistent(format!("note {} appears twice", item.id)));
            }
            if !cells.insert(item.cell) {
                return Err(inconsistent(format!(
                    "note {} shares {:?} with another note",
                    item.id, item.cell
                )));
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if !ids.contains(&edge.source) || !ids.contains(&edge.target) {
                return Err(inconsistent(format!(
                    "edge {} connects a missing note",
                    edge.id
                )));
            }
            if !edge_ids.insert(edge.id) {
                return Err(inconsistent(format!("edge {} appears twice", edge.id)));
            }
        }
        Ok(())
    }

    /// A layout engine with this snapshot's notes placed and geometry built.
    pub fn layout(&self, config: LayoutConfig) -> LayoutEngine {
        LayoutEngine::from_items(config, &self.nodes)
    }
}

fn inconsistent(msg: String) -> SnapshotError {
    SnapshotError::Inconsistent(msg)
}

/// A string key-value store (browser `localStorage`, a file, memory).
pub trait DocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store, used by tests and headless sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage key of a document.
pub fn document_key(document_id: &str) -> String {
    format!("gridnote:doc:{document_id}")
}

pub fn save_document(
    store: &mut dyn DocumentStore,
    document_id: &str,
    snapshot: &Snapshot,
) -> Result<()> {
    let json = snapshot.to_json()?;
    log::debug!(
        "saving {document_id}: {} note(s), {} edge(s)",
        snapshot.nodes.len(),
        snapshot.edges.len()
    );
    store.set(&document_key(document_id), &json)
}

/// Load a document. A missing entry is `NotFound`; an entry that does not
/// parse is `Malformed`; one that parses but fails `Snapshot::validate` is
/// `OutOfRange` or `Inconsistent`. None is replaced by an empty document.
pub fn load_document(store: &dyn DocumentStore, document_id: &str) -> Result<Snapshot> {
    let json = store
        .get(&document_key(document_id))?
        .ok_or_else(|| SnapshotError::NotFound(document_id.to_string()))?;
    Snapshot::from_json(&json)
}
