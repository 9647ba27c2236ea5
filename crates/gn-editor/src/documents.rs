//! Document registry: the list of documents kept in a store.
//!
//! The registry is a JSON array of `{ id, title }` under one key. Document
//! bodies live under their own keys (see `gn_core::snapshot::document_key`).

use gn_core::id::NodeId;
use gn_core::snapshot::{self, DocumentStore, Snapshot, SnapshotError};
use serde::{Deserialize, Serialize};

pub const REGISTRY_KEY: &str = "gridnote:documents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub title: String,
}

/// Every registered document, in creation order. A store without a
/// registry has no documents.
pub fn list_documents(store: &dyn DocumentStore) -> snapshot::Result<Vec<DocumentMeta>> {
    match store.get(REGISTRY_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn write_registry(store: &mut dyn DocumentStore, docs: &[DocumentMeta]) -> snapshot::Result<()> {
    let json = serde_json::to_string(docs)?;
    store.set(REGISTRY_KEY, &json)
}

/// Register a new, empty document and return its entry.
///
/// The ID follows the largest numeric ID already registered. Without a
/// title the document is called `Untitled {id}`.
pub fn create_document(
    store: &mut dyn DocumentStore,
    title: Option<&str>,
) -> snapshot::Result<DocumentMeta> {
    let mut docs = list_documents(store)?;
    let id = NodeId::next_after(docs.iter().map(|d| NodeId::intern(&d.id))).to_string();
    let meta = DocumentMeta {
        title: title.map_or_else(|| format!("Untitled {id}"), str::to_string),
        id,
    };
    snapshot::save_document(store, &meta.id, &Snapshot::default())?;
    docs.push(meta.clone());
    write_registry(store, &docs)?;
    log::info!("created document {} ({:?})", meta.id, meta.title);
    Ok(meta)
}

/// Remove a document and its body. Unknown IDs are `NotFound`.
pub fn delete_document(store: &mut dyn DocumentStore, id: &str) -> snapshot::Result<()> {
    let mut docs = list_documents(store)?;
    let before = docs.len();
    docs.retain(|d| d.id != id);
    if docs.len() == before {
        return Err(SnapshotError::NotFound(id.to_string()));
    }
    store.remove(&snapshot::document_key(id))?;
    write_registry(store, &docs)
}

/// Rename a registered document.
pub fn rename_document(store: &mut dyn DocumentStore, id: &str, title: &str) -> snapshot::Result<()> {
    let mut docs = list_documents(store)?;
    let doc = docs
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or_else(|| SnapshotError::NotFound(id.to_string()))?;
    doc.title = title.to_string();
    write_registry(store, &docs)
}
