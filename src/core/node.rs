//! State nodes and the handles that address them.

use crate::core::tree::StateTree;
use crate::effects::{Handler, Listener};
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

/// Handle to a node inside a [`StateTree`].
///
/// Handles are plain indices into the tree's arena. They are only meaningful
/// for the tree that issued them. Indices are `u32`, so one tree holds at
/// most `u32::MAX` nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize, "state tree arena overflow");
        Self(u32::try_from(idx).unwrap_or(u32::MAX))
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One named state.
///
/// The arena owns every node; `parent` is a back-reference only.
pub(crate) struct StateNode {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) event_transitions: HashMap<String, String>,
    pub(crate) handlers: HashMap<String, Handler>,
    pub(crate) listeners: HashMap<String, Vec<Listener>>,
    pub(crate) properties: Map<String, Value>,
    pub(crate) path: OnceCell<String>,
}

impl StateNode {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            event_transitions: HashMap::new(),
            handlers: HashMap::new(),
            listeners: HashMap::new(),
            properties: Map::new(),
            path: OnceCell::new(),
        }
    }
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("event_transitions", &self.event_transitions)
            .field("handlers", &self.handlers)
            .field(
                "listeners",
                &self
                    .listeners
                    .iter()
                    .map(|(event, listeners)| (event.as_str(), listeners.len()))
                    .collect::<HashMap<_, _>>(),
            )
            .field("properties", &self.properties)
            .field("path", &self.path.get())
            .finish()
    }
}

/// Borrowed view of one node, handed to handlers and listeners.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a StateTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a StateTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a StateTree {
        self.tree
    }

    pub fn name(&self) -> &'a str {
        self.tree.name(self.id).unwrap_or_default()
    }

    pub fn path(&self) -> &'a str {
        self.tree.path(self.id).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|p| NodeRef::new(self.tree, p))
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.is_leaf(self.id)
    }

    /// A free-form value declared on this state.
    pub fn property(&self, key: &str) -> Option<&'a Value> {
        self.tree.property(self.id, key)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_displays_with_hash() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
    }

    #[test]
    fn new_node_is_detached_and_empty() {
        let node = StateNode::new("idle");
        assert_eq!(node.name, "idle");
        assert!(node.parent.is_none());
        assert!(node.children.is_empty());
        assert!(node.path.get().is_none());
    }
}
