//! Ownership invariant checks for a built tree.
//!
//! Every violation found is reported, not just the first, using Stillwater's
//! accumulating `Validation`.

use crate::core::node::NodeId;
use crate::core::tree::StateTree;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A broken ownership invariant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Root {root} has parent {parent}")]
    RootHasParent { root: NodeId, parent: NodeId },

    #[error("Node {child} names {parent} as parent but is not among its children")]
    MissingFromParent { child: NodeId, parent: NodeId },

    #[error("Node {child} is listed {count} times under {parent}")]
    DuplicateChild {
        child: NodeId,
        parent: NodeId,
        count: usize,
    },

    #[error("Node {child} is listed under {listed_by} but its parent is {actual:?}")]
    ForeignChild {
        child: NodeId,
        listed_by: NodeId,
        actual: Option<NodeId>,
    },

    #[error("Node {node} is its own ancestor")]
    Cycle { node: NodeId },

    #[error("Siblings {first} and {second} under {parent} share the name '{name}'")]
    DuplicateName {
        parent: NodeId,
        first: NodeId,
        second: NodeId,
        name: String,
    },
}

type Check = Validation<(), NonEmptyVec<IntegrityError>>;

/// Check every ownership invariant of `tree`.
///
/// # Example
///
/// ```rust
/// use statetree::builder::Declaration;
/// use statetree::core::{check_integrity, StateTree};
///
/// let mut tree = StateTree::new();
/// let root = tree.root();
/// tree.add_child(root, "a", Declaration::new());
///
/// assert!(check_integrity(&tree).is_success());
/// ```
pub fn check_integrity(tree: &StateTree) -> Validation<(), NonEmptyVec<IntegrityError>> {
    let mut checks: Vec<Check> = vec![check_root(tree)];

    for id in tree.ids() {
        checks.push(check_parent_link(tree, id));
        checks.push(check_acyclic(tree, id));
        checks.extend(check_children(tree, id));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn check_root(tree: &StateTree) -> Check {
    let root = tree.root();
    match tree.parent(root) {
        Some(parent) => Validation::fail(IntegrityError::RootHasParent { root, parent }),
        None => Validation::success(()),
    }
}

fn check_parent_link(tree: &StateTree, id: NodeId) -> Check {
    let Some(parent) = tree.parent(id) else {
        return Validation::success(());
    };
    let count = tree.children(parent).iter().filter(|c| **c == id).count();
    match count {
        0 => Validation::fail(IntegrityError::MissingFromParent { child: id, parent }),
        1 => Validation::success(()),
        count => Validation::fail(IntegrityError::DuplicateChild {
            child: id,
            parent,
            count,
        }),
    }
}

fn check_acyclic(tree: &StateTree, id: NodeId) -> Check {
    // A chain longer than the arena must revisit a node.
    if tree.ancestors(id).take(tree.len() + 1).count() > tree.len() {
        Validation::fail(IntegrityError::Cycle { node: id })
    } else {
        Validation::success(())
    }
}

fn check_children(tree: &StateTree, id: NodeId) -> Vec<Check> {
    let children = tree.children(id);
    let mut checks = Vec::with_capacity(children.len());

    for (i, child) in children.iter().copied().enumerate() {
        let actual = tree.parent(child);
        if actual != Some(id) {
            checks.push(Validation::fail(IntegrityError::ForeignChild {
                child,
                listed_by: id,
                actual,
            }));
        }

        let name = tree.name(child).unwrap_or_default();
        if let Some(first) = children[..i]
            .iter()
            .copied()
            .find(|c| *c != child && tree.name(*c) == Some(name))
        {
            checks.push(Validation::fail(IntegrityError::DuplicateName {
                parent: id,
                first,
                second: child,
                name: name.to_string(),
            }));
        }
    }

    checks
}

impl StateTree {
    /// See [`check_integrity`].
    pub fn check_integrity(&self) -> Validation<(), NonEmptyVec<IntegrityError>> {
        check_integrity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Declaration;

    fn sample() -> (StateTree, NodeId, NodeId) {
        let mut tree = StateTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "a", Declaration::new()).unwrap();
        let b = tree.add_child(a, "b", Declaration::new()).unwrap();
        (tree, a, b)
    }

    #[test]
    fn built_tree_is_consistent() {
        let (tree, ..) = sample();
        assert!(check_integrity(&tree).is_success());
    }

    #[test]
    fn tree_with_detached_nodes_is_consistent() {
        let (mut tree, a, _b) = sample();
        let root = tree.root();
        tree.add_child(root, "a", Declaration::new());
        tree.add_child(root, "moved", a);

        assert!(tree.check_integrity().is_success());
    }

    #[test]
    fn all_violations_are_reported() {
        let (mut tree, a, b) = sample();
        let root = tree.root();
        // b claims a parent that does not list it, a lists a node that is not
        // its child, and the root gains a parent.
        tree.node_mut(a).unwrap().children = vec![root];
        tree.node_mut(root).unwrap().parent = Some(b);

        match check_integrity(&tree) {
            Validation::Failure(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, IntegrityError::RootHasParent { .. })));
                assert!(errors.iter().any(
                    |e| matches!(e, IntegrityError::MissingFromParent { child, .. } if *child == b)
                ));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, IntegrityError::ForeignChild { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, IntegrityError::Cycle { .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn duplicate_listing_is_reported() {
        let (mut tree, a, b) = sample();
        tree.node_mut(a).unwrap().children.push(b);

        let result = check_integrity(&tree);
        assert!(result.is_failure());
        if let Validation::Failure(errors) = result {
            assert!(errors
                .iter()
                .any(|e| matches!(e, IntegrityError::DuplicateChild { count: 2, .. })));
        }
    }

    #[test]
    fn duplicate_sibling_names_are_reported() {
        let (mut tree, a, _b) = sample();
        let stray = tree.alloc("b");
        tree.node_mut(stray).unwrap().parent = Some(a);
        tree.node_mut(a).unwrap().children.push(stray);

        let result = check_integrity(&tree);
        assert!(result.is_failure());
        if let Validation::Failure(errors) = result {
            assert!(errors
                .iter()
                .any(|e| matches!(e, IntegrityError::DuplicateName { .. })));
        }
    }
}
