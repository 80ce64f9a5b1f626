//! Declarations: the ordered, loosely typed description of a state.

use crate::core::{NodeId, NodeRef};
use crate::effects::{Handler, Machine, MachineError, TransitionAction, TriggerArgs};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Something that produces a fresh declaration every time a state is
/// instantiated from it.
#[derive(Clone)]
pub struct NodeFactory(Arc<dyn Fn() -> Declaration + Send + Sync>);

impl NodeFactory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Declaration + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn create(&self) -> Declaration {
        (self.0)()
    }
}

impl fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeFactory(..)")
    }
}

/// One named member of a declaration.
#[derive(Clone, Debug)]
pub enum Member {
    /// A nested state.
    State(Declaration),

    /// A nested state built on demand.
    Factory(NodeFactory),

    /// A handler; transition handlers also declare an event transition.
    Handler(Handler),

    /// Any other value, kept as a property of the state.
    Value(Value),

    /// Nothing at all. Skipped.
    Empty,
}

impl From<Declaration> for Member {
    fn from(declaration: Declaration) -> Self {
        Self::State(declaration)
    }
}

impl From<NodeFactory> for Member {
    fn from(factory: NodeFactory) -> Self {
        Self::Factory(factory)
    }
}

impl From<Handler> for Member {
    fn from(handler: Handler) -> Self {
        Self::Handler(handler)
    }
}

impl From<TransitionAction> for Member {
    fn from(action: TransitionAction) -> Self {
        Self::Handler(Handler::Transition(action))
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<T: Into<Member>> From<Option<T>> for Member {
    fn from(member: Option<T>) -> Self {
        member.map_or(Self::Empty, Into::into)
    }
}

/// Where a child passed to [`StateTree::add_child`](crate::core::StateTree::add_child)
/// comes from.
#[derive(Clone, Debug)]
pub enum ChildSource {
    /// A node already in the tree; it is renamed and moved.
    Node(NodeId),

    /// A declaration to instantiate.
    Declaration(Declaration),

    /// A factory to instantiate.
    Factory(NodeFactory),

    /// Nothing. Attaching it is a no-op.
    Empty,
}

impl From<NodeId> for ChildSource {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Declaration> for ChildSource {
    fn from(declaration: Declaration) -> Self {
        Self::Declaration(declaration)
    }
}

impl From<NodeFactory> for ChildSource {
    fn from(factory: NodeFactory) -> Self {
        Self::Factory(factory)
    }
}

impl<T: Into<ChildSource>> From<Option<T>> for ChildSource {
    fn from(source: Option<T>) -> Self {
        source.map_or(Self::Empty, Into::into)
    }
}

/// The description of one state: its named members in declaration order,
/// and optionally an explicit children mapping.
///
/// Members can be nested states, handlers, transition actions or plain
/// values. The builder sorts them out; anything it does not recognise as a
/// state or handler is kept as a property.
///
/// # Example
///
/// ```rust
/// use statetree::builder::{Declaration, TreeBuilder};
/// use statetree::core::resolve;
/// use serde_json::json;
///
/// let declaration = Declaration::new()
///     .state(
///         "closed",
///         Declaration::new()
///             .transition("open", "opened")
///             .value("label", json!("Closed")),
///     )
///     .state("opened", Declaration::new().transition("close", "closed"));
///
/// let tree = TreeBuilder::new().build(declaration);
/// let closed = tree.find("closed").unwrap();
///
/// assert_eq!(resolve(&tree, closed, "open"), Some("opened"));
/// assert_eq!(tree.property(closed, "label"), Some(&json!("Closed")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Declaration {
    members: Vec<(String, Member)>,
    children: Option<Vec<(String, ChildSource)>>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add any member.
    pub fn member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.members.push((name.into(), member.into()));
        self
    }

    /// Add a nested state.
    pub fn state(self, name: impl Into<String>, declaration: Declaration) -> Self {
        self.member(name, Member::State(declaration))
    }

    /// Add a nested state built by `factory` each time.
    pub fn factory<F>(self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Declaration + Send + Sync + 'static,
    {
        self.member(name, NodeFactory::new(factory))
    }

    /// Add a plain handler.
    pub fn handler<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(NodeRef<'_>, &mut dyn Machine, &TriggerArgs) -> Result<(), MachineError>
            + Send
            + Sync
            + 'static,
    {
        self.member(name, Handler::new(f))
    }

    /// Add a transition action: `event` moves to `target`.
    pub fn transition(self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.member(event, Handler::transition(target))
    }

    /// Add a free-form value.
    pub fn value(self, name: impl Into<String>, value: Value) -> Self {
        self.member(name, Member::Value(value))
    }

    /// Declare the children explicitly.
    ///
    /// When present, this mapping is the only source of children: nested
    /// states among the members are ignored, and transition actions stay
    /// callable handlers without declaring event transitions.
    pub fn with_children<I, N, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<ChildSource>,
    {
        self.children = Some(
            children
                .into_iter()
                .map(|(name, child)| (name.into(), child.into()))
                .collect(),
        );
        self
    }

    pub fn members(&self) -> &[(String, Member)] {
        &self.members
    }

    pub fn has_explicit_children(&self) -> bool {
        self.children.is_some()
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, Member)>, Option<Vec<(String, ChildSource)>>) {
        (self.members, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn members_keep_declaration_order() {
        let declaration = Declaration::new()
            .state("b", Declaration::new())
            .value("a", json!(1))
            .transition("go", "b");

        let names: Vec<_> = declaration.members().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "go"]);
    }

    #[test]
    fn none_becomes_empty_member() {
        let member: Member = Option::<Declaration>::None.into();
        assert!(matches!(member, Member::Empty));

        let source: ChildSource = Option::<NodeId>::None.into();
        assert!(matches!(source, ChildSource::Empty));
    }

    #[test]
    fn transition_action_becomes_transition_handler() {
        let member: Member = crate::effects::make_transition_action("x").into();
        match member {
            Member::Handler(handler) => assert_eq!(handler.transition_target(), Some("x")),
            other => panic!("Expected handler, got {other:?}"),
        }
    }

    #[test]
    fn factory_creates_fresh_declarations() {
        let factory = NodeFactory::new(|| Declaration::new().value("n", json!(1)));
        assert_eq!(factory.create().members().len(), 1);
        assert_eq!(factory.create().members().len(), 1);
    }

    #[test]
    fn explicit_children_are_recorded() {
        let declaration = Declaration::new().with_children([("a", Declaration::new())]);
        assert!(declaration.has_explicit_children());
        assert!(!Declaration::new().has_explicit_children());
    }
}
