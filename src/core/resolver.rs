//! Upward event resolution.
//!
//! An event is looked up on the node it fired at, then on each ancestor in
//! turn. The nearest declaration wins, so inner states shadow outer ones.

use crate::core::node::NodeId;
use crate::core::tree::StateTree;
use std::iter;

/// Target path for `event`, searching from `start` up to the root.
///
/// Returns `None` when no node on the chain declares the event.
///
/// # Example
///
/// ```rust
/// use statetree::builder::Declaration;
/// use statetree::core::{resolve, StateTree};
///
/// let mut tree = StateTree::new();
/// let root = tree.root();
/// tree.set_event_transition(root, "reset", "idle");
/// let busy = tree.add_child(root, "busy", Declaration::new()).unwrap();
///
/// assert_eq!(resolve(&tree, busy, "reset"), Some("idle"));
/// assert_eq!(resolve(&tree, busy, "unknown"), None);
/// ```
pub fn resolve<'a>(tree: &'a StateTree, start: NodeId, event: &str) -> Option<&'a str> {
    resolve_source(tree, start, event).map(|(_, target)| target)
}

/// Like [`resolve`], also returning the node that declared the event.
pub fn resolve_source<'a>(
    tree: &'a StateTree,
    start: NodeId,
    event: &str,
) -> Option<(NodeId, &'a str)> {
    if !tree.contains(start) {
        return None;
    }
    iter::once(start)
        .chain(tree.ancestors(start))
        .find_map(|node| tree.event_transition(node, event).map(|t| (node, t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Declaration;

    fn nested() -> (StateTree, NodeId, NodeId, NodeId) {
        let mut tree = StateTree::new();
        let root = tree.root();
        let outer = tree.add_child(root, "outer", Declaration::new()).unwrap();
        let middle = tree.add_child(outer, "middle", Declaration::new()).unwrap();
        let inner = tree.add_child(middle, "inner", Declaration::new()).unwrap();
        (tree, outer, middle, inner)
    }

    #[test]
    fn local_declaration_is_found() {
        let (mut tree, _outer, middle, inner) = nested();
        tree.set_event_transition(inner, "go", "outer");

        assert_eq!(resolve(&tree, inner, "go"), Some("outer"));
        assert_eq!(resolve(&tree, middle, "go"), None);
    }

    #[test]
    fn ancestor_declaration_is_found_from_descendant() {
        let (mut tree, outer, _middle, inner) = nested();
        tree.set_event_transition(outer, "cancel", "outer");

        assert_eq!(resolve(&tree, inner, "cancel"), Some("outer"));
        assert_eq!(
            resolve_source(&tree, inner, "cancel"),
            Some((outer, "outer"))
        );
    }

    #[test]
    fn nearest_declaration_shadows_outer() {
        let (mut tree, outer, middle, inner) = nested();
        tree.set_event_transition(tree.root(), "next", "from-root");
        tree.set_event_transition(outer, "next", "from-outer");
        tree.set_event_transition(middle, "next", "from-middle");

        assert_eq!(resolve(&tree, inner, "next"), Some("from-middle"));
        assert_eq!(resolve(&tree, outer, "next"), Some("from-outer"));
        assert_eq!(resolve(&tree, tree.root(), "next"), Some("from-root"));
    }

    #[test]
    fn root_declaration_is_the_last_resort() {
        let (mut tree, _outer, _middle, inner) = nested();
        let root = tree.root();
        tree.set_event_transition(root, "reset", "outer");

        assert_eq!(resolve_source(&tree, inner, "reset"), Some((root, "outer")));
    }

    #[test]
    fn unknown_start_is_absent() {
        let (tree, ..) = nested();
        assert_eq!(resolve(&tree, NodeId::new(99), "go"), None);
    }
}
