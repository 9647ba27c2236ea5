//! Connectivity traversal over the edge set.
//!
//! Used to highlight everything upstream and downstream of a selection.

use crate::edges::EdgeSet;
use crate::id::NodeId;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Bfs, Reversed, VisitMap, Walker};

/// Which way to follow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Walk backward along edges pointing at the current node.
    Incoming,
    /// Walk forward along edges leaving the current node.
    Outgoing,
}

fn build_graph(seeds: &[NodeId], edges: &EdgeSet) -> DiGraphMap<NodeId, ()> {
    let mut graph = DiGraphMap::new();
    for &seed in seeds {
        graph.add_node(seed);
    }
    for edge in edges {
        graph.add_edge(edge.source, edge.target, ());
    }
    graph
}

/// Seeds followed by every node reachable from them in `flow` direction,
/// each reported once, in breadth-first order.
pub fn related_nodes(seeds: &[NodeId], edges: &EdgeSet, flow: Flow) -> Vec<NodeId> {
    let Some((&first, rest)) = seeds.split_first() else {
        return Vec::new();
    };
    let graph = build_graph(seeds, edges);

    match flow {
        Flow::Outgoing => {
            let mut bfs = Bfs::new(&graph, first);
            queue_seeds(&mut bfs, rest);
            bfs.iter(&graph).collect()
        }
        Flow::Incoming => {
            let reversed = Reversed(&graph);
            let mut bfs = Bfs::new(reversed, first);
            queue_seeds(&mut bfs, rest);
            bfs.iter(reversed).collect()
        }
    }
}

/// Queue the remaining seeds so the search starts from all of them at once.
fn queue_seeds<VM: VisitMap<NodeId>>(bfs: &mut Bfs<NodeId, VM>, rest: &[NodeId]) {
    for &seed in rest {
        if bfs.discovered.visit(seed) {
            bfs.stack.push_back(seed);
        }
    }
}

/// Everything upstream of `seeds` followed by everything downstream.
///
/// The two passes are concatenated without de-duplication; seeds and nodes
/// reachable both ways appear twice. Treat the result as a set.
pub fn related_all_nodes(seeds: &[NodeId], edges: &EdgeSet) -> Vec<NodeId> {
    let mut all = related_nodes(seeds, edges, Flow::Incoming);
    all.extend(related_nodes(seeds, edges, Flow::Outgoing));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use std::collections::HashSet;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    fn chain(pairs: &[(&str, &str)]) -> EdgeSet {
        pairs
            .iter()
            .map(|(s, t)| Edge::new(id(s), id(t)))
            .collect()
    }

    fn set(ids: Vec<NodeId>) -> HashSet<NodeId> {
        ids.into_iter().collect()
    }

    #[test]
    fn middle_seed_reaches_both_ends() {
        let edges = chain(&[("A", "B"), ("B", "C")]);
        let related = related_all_nodes(&[id("B")], &edges);
        assert_eq!(set(related), set(vec![id("A"), id("B"), id("C")]));
    }

    #[test]
    fn directions_are_independent() {
        let edges = chain(&[("A", "B"), ("B", "C"), ("X", "C")]);
        let up = related_nodes(&[id("B")], &edges, Flow::Incoming);
        assert_eq!(up, vec![id("B"), id("A")]);
        let down = related_nodes(&[id("B")], &edges, Flow::Outgoing);
        assert_eq!(down, vec![id("B"), id("C")]);
    }

    #[test]
    fn cycles_terminate() {
        let edges = chain(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let down = related_nodes(&[id("A")], &edges, Flow::Outgoing);
        assert_eq!(down, vec![id("A"), id("B"), id("C")]);
    }

    #[test]
    fn multiple_seeds_and_isolated_seed() {
        let edges = chain(&[("A", "B"), ("P", "Q")]);
        let down = related_nodes(&[id("A"), id("P"), id("lonely")], &edges, Flow::Outgoing);
        assert_eq!(set(down), set(vec![id("A"), id("P"), id("lonely"), id("B"), id("Q")]));
    }

    #[test]
    fn empty_seed_set_finds_nothing() {
        let edges = chain(&[("A", "B")]);
        assert!(related_all_nodes(&[], &edges).is_empty());
    }
}
