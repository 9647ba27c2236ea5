//! The document's edge list.

use crate::id::NodeId;
use crate::model::Edge;
use serde::{Deserialize, Serialize};

/// Edges in insertion order, unique by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet {
    edges: Vec<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Add an edge. Returns `false` if an edge with the same ID exists.
    pub fn insert(&mut self, edge: Edge) -> bool {
        if self.get(edge.id).is_some() {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn get(&self, id: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Edge> {
        let pos = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(pos))
    }

    /// First edge running `source → target`.
    pub fn find(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    pub fn connects(&self, source: NodeId, target: NodeId) -> bool {
        self.find(source, target).is_some()
    }

    /// Remove every edge touching `node`, returning them.
    pub fn remove_touching(&mut self, node: NodeId) -> Vec<Edge> {
        let (removed, kept) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.touches(node));
        self.edges = kept;
        removed
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        let mut set = EdgeSet::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut set = EdgeSet::new();
        assert!(set.insert(Edge::new(id("1"), id("2"))));
        assert!(!set.insert(Edge::new(id("1"), id("2"))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_touching_keeps_unrelated_edges() {
        let mut set: EdgeSet = [
            Edge::new(id("a"), id("b")),
            Edge::new(id("b"), id("c")),
            Edge::new(id("c"), id("d")),
        ]
        .into_iter()
        .collect();
        let removed = set.remove_touching(id("b"));
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert!(set.connects(id("c"), id("d")));
    }
}
