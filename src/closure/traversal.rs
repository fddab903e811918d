//! Graph traversal primitives used by the closure engine
//!
//! Each primitive grows a set in place and never removes from it.

use std::collections::{HashSet, VecDeque};

use crate::extract::{DirectedEdges, GuardedEdges, NodeId, UndirectedEdges};

/// Directed transitive closure: add everything reachable from `set` along
/// `edges`, breadth-first.
pub fn forward_closure(set: &mut HashSet<NodeId>, edges: &DirectedEdges) {
    let mut queue: VecDeque<NodeId> = set.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        for &next in edges.successors(node) {
            if set.insert(next) {
                queue.push_back(next);
            }
        }
    }
}

/// Connected-component closure: expand `set` to the full components of its
/// members in the undirected graph `edges`.
pub fn component_closure(set: &mut HashSet<NodeId>, edges: &UndirectedEdges) {
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(set.len());
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    let members: Vec<NodeId> = set.iter().copied().collect();
    for start in members {
        if !visited.insert(start) {
            continue;
        }
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            set.insert(node);
            for &peer in edges.neighbours(node) {
                if visited.insert(peer) {
                    queue.push_back(peer);
                }
            }
        }
    }
}

/// Guarded expansion: for every member of `active` whose guard holds, add
/// its targets to `into`. Returns the number of ids added.
pub fn guarded_expansion(
    active: &HashSet<NodeId>,
    edges: &GuardedEdges,
    into: &mut HashSet<NodeId>,
) -> usize {
    let before = into.len();
    for &node in active {
        into.extend(edges.active_targets(node).iter().copied());
    }
    into.len() - before
}
