//! The state tree: an arena of state nodes addressed by [`NodeId`].

use crate::builder::{self, ChildSource, Declaration};
use crate::config::TreeConfig;
use crate::core::cache::{PathCache, TypeKey};
use crate::core::node::{NodeId, NodeRef, StateNode};
use crate::effects::{Handler, Machine, MachineError, TriggerArgs};
use serde_json::Value;
use std::iter;
use std::sync::Arc;

/// A tree of named states.
///
/// The tree owns every node it ever allocated. Parents own their children
/// through `children`; each child points back at its parent by handle only.
/// A node detached by a sibling replacement stays in the arena without a
/// parent until the tree is dropped.
///
/// Structure is expected to be fixed once building finishes. Paths are
/// computed lazily and cached per node; asking for a path before the
/// parent chain is wired yields the path of whatever chain exists at that
/// moment.
///
/// # Example
///
/// ```rust
/// use statetree::builder::Declaration;
/// use statetree::core::StateTree;
///
/// let mut tree = StateTree::new();
/// let root = tree.root();
/// let a = tree.add_child(root, "a", Declaration::new()).unwrap();
/// let b = tree.add_child(a, "b", Declaration::new()).unwrap();
///
/// assert_eq!(tree.path(b), Some("a.b"));
/// assert!(tree.is_leaf(b));
/// assert!(!tree.is_leaf(a));
/// assert_eq!(tree.find("a.b"), Some(b));
/// ```
#[derive(Debug)]
pub struct StateTree {
    nodes: Vec<StateNode>,
    root: NodeId,
    config: TreeConfig,
    lookups: PathCache<Option<NodeId>>,
}

impl StateTree {
    /// Tree with an unnamed root and default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Tree with an unnamed root.
    pub fn with_config(config: TreeConfig) -> Self {
        Self::named_with_config("", config)
    }

    /// Tree whose root carries `name`; every path then starts with it.
    pub fn named(name: impl Into<String>) -> Self {
        Self::named_with_config(name, TreeConfig::default())
    }

    pub fn named_with_config(name: impl Into<String>, config: TreeConfig) -> Self {
        Self {
            nodes: vec![StateNode::new(name)],
            root: NodeId::new(0),
            config,
            lookups: PathCache::new(),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.nodes.len()
    }

    /// Every node handle, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&StateNode> {
        self.nodes.get(id.idx())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut StateNode> {
        self.nodes.get_mut(id.idx())
    }

    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.contains(id).then(|| NodeRef::new(self, id))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children in declaration order. Empty for an unknown handle.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Direct child called `name`.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.name(*c) == Some(name))
    }

    /// True iff the node has no children right now.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Dotted path of the node.
    ///
    /// `parent path + separator + name`, or just `name` for the root, a
    /// detached node, or a child of an unnamed root. An empty name anywhere
    /// else is an ordinary empty segment, so `""` under `a` is `"a."`.
    pub fn path(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        Some(node.path.get_or_init(|| self.compute_path(node)).as_str())
    }

    fn compute_path(&self, node: &StateNode) -> String {
        let Some(parent) = node.parent else {
            return node.name.clone();
        };
        if parent == self.root && self.nodes[parent.idx()].name.is_empty() {
            return node.name.clone();
        }
        let parent_path = self.path(parent).unwrap_or_default();
        format!("{parent_path}{}{}", self.config.separator, node.name)
    }

    pub fn property(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.node(id)?.properties.get(key)
    }

    pub fn set_property(&mut self, id: NodeId, key: impl Into<String>, value: Value) {
        if let Some(node) = self.node_mut(id) {
            node.properties.insert(key.into(), value);
        }
    }

    /// Target declared for `event` on this node only; ancestors are not
    /// consulted. See [`resolve`](crate::core::resolve) for the upward search.
    pub fn event_transition(&self, id: NodeId, event: &str) -> Option<&str> {
        self.node(id)?.event_transitions.get(event).map(String::as_str)
    }

    pub fn set_event_transition(
        &mut self,
        id: NodeId,
        event: impl Into<String>,
        target: impl Into<String>,
    ) {
        if let Some(node) = self.node_mut(id) {
            node.event_transitions.insert(event.into(), target.into());
        }
    }

    /// Local event transitions of a node, in no particular order.
    pub fn event_transitions(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.event_transitions.iter())
            .map(|(event, target)| (event.as_str(), target.as_str()))
    }

    pub fn handler(&self, id: NodeId, event: &str) -> Option<&Handler> {
        self.node(id)?.handlers.get(event)
    }

    pub fn set_handler(&mut self, id: NodeId, event: impl Into<String>, handler: Handler) {
        if let Some(node) = self.node_mut(id) {
            node.handlers.insert(event.into(), handler);
        }
    }

    /// Register a listener for `event` on a node.
    pub fn on<F>(&mut self, id: NodeId, event: impl Into<String>, listener: F)
    where
        F: Fn(NodeRef<'_>, &mut dyn Machine, &TriggerArgs) -> Result<(), MachineError>
            + Send
            + Sync
            + 'static,
    {
        if let Some(node) = self.node_mut(id) {
            node.listeners
                .entry(event.into())
                .or_default()
                .push(Arc::new(listener));
        }
    }

    /// Fire `event` on a node.
    ///
    /// A handler declared under `event` runs first. Every listener
    /// registered for `event` runs afterwards, whether or not a handler
    /// existed. The first error stops the sequence and is returned.
    pub fn trigger(
        &self,
        id: NodeId,
        event: &str,
        owner: &mut dyn Machine,
        args: &TriggerArgs,
    ) -> Result<(), MachineError> {
        let Some(node) = self.node(id) else {
            return Ok(());
        };

        if let Some(handler) = node.handlers.get(event) {
            handler.call(NodeRef::new(self, id), &mut *owner, args)?;
        }

        if let Some(listeners) = node.listeners.get(event) {
            for listener in listeners {
                listener(NodeRef::new(self, id), &mut *owner, args)?;
            }
        }

        Ok(())
    }

    /// Attach a child under `parent` as `name`.
    ///
    /// - [`ChildSource::Empty`] does nothing and returns `None`.
    /// - [`ChildSource::Node`] renames and reparents an existing node. Moving
    ///   the root, or moving a node beneath itself, is refused.
    /// - [`ChildSource::Declaration`] and [`ChildSource::Factory`] build a new
    ///   subtree.
    ///
    /// A sibling already called `name` is replaced in place and detached.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        source: impl Into<ChildSource>,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let name = name.into();

        match source.into() {
            ChildSource::Empty => {
                tracing::trace!(%parent, name = %name, "ignoring empty child");
                None
            }
            ChildSource::Node(id) => self.reparent(parent, name, id),
            ChildSource::Declaration(declaration) => {
                Some(self.instantiate(parent, name, declaration))
            }
            ChildSource::Factory(factory) => Some(self.instantiate(parent, name, factory.create())),
        }
    }

    fn instantiate(&mut self, parent: NodeId, name: String, declaration: Declaration) -> NodeId {
        let id = self.alloc(name);
        self.link(parent, id);
        builder::populate(self, id, declaration);
        id
    }

    fn reparent(&mut self, parent: NodeId, name: String, id: NodeId) -> Option<NodeId> {
        if !self.contains(id) || id == self.root || id == parent || self.is_ancestor(id, parent) {
            tracing::warn!(%id, %parent, "refusing to reparent node beneath itself");
            return None;
        }

        if self.parent(id) == Some(parent) {
            self.rename_in_place(parent, name, id);
            return Some(id);
        }

        if let Some(old_parent) = self.parent(id) {
            self.nodes[old_parent.idx()].children.retain(|c| *c != id);
        }
        let node = &mut self.nodes[id.idx()];
        node.parent = None;
        node.name = name;

        self.link(parent, id);
        self.invalidate_paths(id);
        tracing::debug!(%id, %parent, "reparented node");
        Some(id)
    }

    /// Rename a node that stays under `parent`, keeping its slot.
    fn rename_in_place(&mut self, parent: NodeId, name: String, id: NodeId) {
        if let Some(clash) = self.child(parent, &name).filter(|c| *c != id) {
            self.nodes[parent.idx()].children.retain(|c| *c != clash);
            self.nodes[clash.idx()].parent = None;
            self.invalidate_paths(clash);
            tracing::debug!(%parent, replaced = %clash, by = %id, "replaced child");
        }
        self.nodes[id.idx()].name = name;
        self.invalidate_paths(id);
    }

    pub(crate) fn alloc(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(StateNode::new(name));
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        let existing = self.child(parent, &self.nodes[child.idx()].name);

        match existing {
            Some(old) => {
                let children = &mut self.nodes[parent.idx()].children;
                if let Some(slot) = children.iter_mut().find(|c| **c == old) {
                    *slot = child;
                }
                self.nodes[old.idx()].parent = None;
                self.invalidate_paths(old);
                tracing::debug!(%parent, replaced = %old, by = %child, "replaced child");
            }
            None => {
                self.nodes[parent.idx()].children.push(child);
                tracing::debug!(%parent, %child, "attached child");
            }
        }
        self.nodes[child.idx()].parent = Some(parent);
    }

    fn invalidate_paths(&mut self, id: NodeId) {
        for n in self.subtree(id) {
            self.nodes[n.idx()].path.take();
        }
    }

    /// Parents of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Number of ancestors above the node.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// True when `ancestor` lies strictly above `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Every node below `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        iter::once(id).chain(self.descendants(id)).collect()
    }

    /// Leaf states at or below `id`, in pre-order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .filter(|n| self.is_leaf(*n))
            .collect()
    }

    /// Deepest node that is `a` or above it and also `b` or above it.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let chain: Vec<NodeId> = iter::once(a).chain(self.ancestors(a)).collect();
        iter::once(b)
            .chain(self.ancestors(b))
            .find(|n| chain.contains(n))
    }

    /// Node at a dotted path, starting from the root.
    ///
    /// With a named root the path must start with the root's name; with an
    /// unnamed root the empty path is the root itself.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let root_name = self.name(self.root).unwrap_or_default();
        if path.is_empty() {
            return root_name.is_empty().then_some(self.root);
        }

        let mut segments = path.split(self.config.separator);
        if !root_name.is_empty() && segments.next()? != root_name {
            return None;
        }

        segments.try_fold(self.root, |current, segment| self.child(current, segment))
    }

    /// [`find`](Self::find), memoised per owner type.
    ///
    /// Misses are cached too. Every machine type gets its own entries; all
    /// machines of one type share them.
    pub fn find_cached(&mut self, key: TypeKey, path: &str) -> Option<NodeId> {
        if let Some(hit) = self.lookups.get(key, path) {
            tracing::trace!(owner = key.name(), path, "path cache hit");
            return *hit;
        }
        let found = self.find(path);
        self.lookups.set(key, path, found);
        found
    }

    /// Cache behind [`find_cached`](Self::find_cached).
    pub fn path_cache(&self) -> &PathCache<Option<NodeId>> {
        &self.lookups
    }
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the ancestors of a node, nearest first.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a StateTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
