//! Edge tables of the reference graph
//!
//! Each edge semantics gets its own type so a traversal can only be handed
//! the kind of edges it is meant to follow.

use std::collections::HashSet;

use super::arena::NodeId;

/// Adjacency lists indexed by source node. Targets may belong to a
/// different arena than sources (symptom → examination fan-out).
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: Vec<Vec<NodeId>>,
}

impl Adjacency {
    pub(crate) fn insert(&mut self, from: NodeId, to: NodeId) {
        if self.lists.len() <= from.index() {
            self.lists.resize_with(from.index() + 1, Vec::new);
        }
        self.lists[from.index()].push(to);
    }

    /// Sort and dedup every list; called once when extraction is done
    pub(crate) fn seal(&mut self) {
        for list in &mut self.lists {
            list.sort_unstable();
            list.dedup();
        }
    }

    pub fn targets(&self, from: NodeId) -> &[NodeId] {
        self.lists
            .get(from.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

/// Directed, transitive "keeping A keeps B" edges (symptom collapse)
#[derive(Debug, Clone, Default)]
pub struct DirectedEdges(Adjacency);

impl DirectedEdges {
    pub(crate) fn link(&mut self, from: NodeId, to: NodeId) {
        self.0.insert(from, to);
    }

    pub(crate) fn seal(&mut self) {
        self.0.seal();
    }

    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.0.targets(node)
    }

    pub fn edge_count(&self) -> usize {
        self.0.edge_count()
    }
}

/// Symmetric "keep together" edges (lab equivalence). A link declared by
/// either side is stored in both directions.
#[derive(Debug, Clone, Default)]
pub struct UndirectedEdges(Adjacency);

impl UndirectedEdges {
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId) {
        self.0.insert(a, b);
        self.0.insert(b, a);
    }

    pub(crate) fn seal(&mut self) {
        self.0.seal();
    }

    pub fn neighbours(&self, node: NodeId) -> &[NodeId] {
        self.0.targets(node)
    }

    /// Number of distinct undirected links
    pub fn link_count(&self) -> usize {
        self.0.edge_count().div_ceil(2)
    }
}

/// Edges that only exist while their source passes a guard (a surgery's
/// complication symptoms). Whether the source is itself reachable is
/// decided by the closure, not here.
#[derive(Debug, Clone, Default)]
pub struct GuardedEdges {
    guarded: HashSet<NodeId>,
    edges: Adjacency,
}

impl GuardedEdges {
    pub(crate) fn guard(&mut self, node: NodeId) {
        self.guarded.insert(node);
    }

    pub(crate) fn link(&mut self, from: NodeId, to: NodeId) {
        self.edges.insert(from, to);
    }

    pub(crate) fn seal(&mut self) {
        self.edges.seal();
    }

    pub fn is_guarded(&self, node: NodeId) -> bool {
        self.guarded.contains(&node)
    }

    /// Targets of `node` when its guard holds, otherwise nothing
    pub fn active_targets(&self, node: NodeId) -> &[NodeId] {
        if self.is_guarded(node) {
            self.edges.targets(node)
        } else {
            &[]
        }
    }

    /// Targets of `node` regardless of its guard
    pub fn all_targets(&self, node: NodeId) -> &[NodeId] {
        self.edges.targets(node)
    }
}
