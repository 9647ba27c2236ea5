//! Connection handles.
//!
//! Every edge endpoint owns a handle on its note: sources sit on the
//! note's right side, targets on its left. Handle IDs are per note
//! (`source_1`, `target_2`, ...) and are released when their edge goes.

use gn_core::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Source,
    Target,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleKind::Source => "source",
            HandleKind::Target => "target",
        })
    }
}

/// Side of the note a handle is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handle {
    pub id: String,
    pub kind: HandleKind,
}

impl Handle {
    pub fn side(&self) -> Side {
        match self.kind {
            HandleKind::Source => Side::Right,
            HandleKind::Target => Side::Left,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    by_node: HashMap<NodeId, SmallVec<[Handle; 4]>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handles(&self, node: NodeId) -> &[Handle] {
        self.by_node.get(&node).map(|h| h.as_slice()).unwrap_or(&[])
    }

    /// Register a handle on `node` and return its ID.
    ///
    /// Without an explicit ID the next free `{kind}_{n}` is used, counting
    /// from the number of handles already on the note. An explicit ID that
    /// is already registered is reused as is.
    pub fn add(&mut self, node: NodeId, kind: HandleKind, id: Option<&str>) -> String {
        let handles = self.by_node.entry(node).or_default();
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                let mut n = handles.len() + 1;
                loop {
                    let candidate = format!("{kind}_{n}");
                    if !handles.iter().any(|h| h.id == candidate) {
                        break candidate;
                    }
                    n += 1;
                }
            }
        };
        if !handles.iter().any(|h| h.id == id) {
            handles.push(Handle {
                id: id.clone(),
                kind,
            });
        }
        id
    }

    pub fn remove(&mut self, node: NodeId, id: &str) -> bool {
        let Some(handles) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = handles.len();
        handles.retain(|h| h.id != id);
        let removed = handles.len() != before;
        if handles.is_empty() {
            self.by_node.remove(&node);
        }
        removed
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.by_node.remove(&node);
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_all_handles_on_the_note() {
        let mut reg = HandleRegistry::new();
        let n = NodeId::intern("1");
        assert_eq!(reg.add(n, HandleKind::Source, None), "source_1");
        assert_eq!(reg.add(n, HandleKind::Target, None), "target_2");
        assert_eq!(reg.add(n, HandleKind::Source, None), "source_3");
        assert_eq!(reg.handles(n).len(), 3);
        assert_eq!(reg.handles(n)[1].side(), Side::Left);
    }

    #[test]
    fn freed_slot_does_not_collide() {
        let mut reg = HandleRegistry::new();
        let n = NodeId::intern("1");
        reg.add(n, HandleKind::Source, None);
        reg.add(n, HandleKind::Source, None);
        assert!(reg.remove(n, "source_1"));
        // One handle left, so counting restarts at 2, which is taken.
        assert_eq!(reg.add(n, HandleKind::Source, None), "source_3");
    }

    #[test]
    fn explicit_ids_are_kept() {
        let mut reg = HandleRegistry::new();
        let n = NodeId::intern("9");
        assert_eq!(reg.add(n, HandleKind::Target, Some("t")), "t");
        assert_eq!(reg.add(n, HandleKind::Target, Some("t")), "t");
        assert_eq!(reg.handles(n).len(), 1);
        assert!(reg.remove(n, "t"));
        assert!(reg.handles(n).is_empty());
        assert!(!reg.remove(n, "t"));
    }
}
