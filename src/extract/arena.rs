use std::collections::HashMap;

/// Dense index of an interned id within one [`IdArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Interns the ids of one entity kind. Referenced-but-undefined ids are
/// interned too: they are valid closure members, just never deletable.
#[derive(Debug, Clone, Default)]
pub struct IdArena {
    names: Vec<String>,
    lookup: HashMap<String, NodeId>,
}

impl IdArena {
    pub fn intern(&mut self, id: &str) -> NodeId {
        if let Some(&node) = self.lookup.get(id) {
            return node;
        }
        let node = NodeId(self.names.len());
        self.names.push(id.to_string());
        self.lookup.insert(id.to_string(), node);
        node
    }

    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.lookup.get(id).copied()
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.names[node.index()]
    }

    /// Interned ids in interning order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NodeId(i), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
