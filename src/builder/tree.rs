//! Builder turning declarations into state trees.

use crate::builder::declaration::{Declaration, Member};
use crate::config::TreeConfig;
use crate::core::{NodeId, StateTree};

/// Builder for constructing a [`StateTree`] from a [`Declaration`].
///
/// Building never fails. Members the builder cannot use are skipped, since
/// a declaration doubles as a free-form namespace for whatever else a state
/// wants to carry.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    config: TreeConfig,
    root_name: String,
}

impl TreeBuilder {
    /// Create a new builder with default configuration and an unnamed root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for the tree being built.
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Give the root a name (it is unnamed by default).
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Build the tree, with `declaration` describing the root.
    pub fn build(self, declaration: Declaration) -> StateTree {
        let mut tree = StateTree::named_with_config(self.root_name, self.config);
        let root = tree.root();
        populate(&mut tree, root, declaration);
        tracing::debug!(nodes = tree.len(), "built state tree");
        tree
    }
}

/// Apply `declaration` to an existing node and return its children.
///
/// Children are returned in declaration order together with their names.
pub fn build_into(
    tree: &mut StateTree,
    parent: NodeId,
    declaration: Declaration,
) -> Vec<(String, NodeId)> {
    populate(tree, parent, declaration);
    tree.children(parent)
        .iter()
        .map(|child| (tree.name(*child).unwrap_or_default().to_string(), *child))
        .collect()
}

pub(crate) fn populate(tree: &mut StateTree, id: NodeId, declaration: Declaration) {
    let reserved = tree.config().reserved_key.clone();
    let (members, children) = declaration.into_parts();
    let explicit = children.is_some();

    for (name, member) in members {
        if name == reserved {
            tracing::trace!(%id, name = %name, "skipping reserved member");
            continue;
        }

        match member {
            Member::Handler(handler) => {
                match handler.transition_target() {
                    Some(target) if !explicit => {
                        tree.set_event_transition(id, name.clone(), target);
                    }
                    Some(_) => {
                        tracing::trace!(%id, name = %name, "transition not scanned under explicit children");
                    }
                    None => {}
                }
                tree.set_handler(id, name, handler);
            }
            Member::State(declaration) if !explicit => {
                tree.add_child(id, name, declaration);
            }
            Member::Factory(factory) if !explicit => {
                tree.add_child(id, name, factory);
            }
            Member::State(_) | Member::Factory(_) => {
                tracing::trace!(%id, name = %name, "state member shadowed by explicit children");
            }
            Member::Value(value) => tree.set_property(id, name, value),
            Member::Empty => {
                tracing::trace!(%id, name = %name, "skipping empty member");
            }
        }
    }

    for (name, source) in children.into_iter().flatten() {
        if name == reserved {
            continue;
        }
        tree.add_child(id, name, source);
    }
}
