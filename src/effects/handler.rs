//! Event handlers and listeners attached to state nodes.

use crate::core::NodeRef;
use crate::effects::machine::{Machine, MachineError};
use crate::effects::transition::{make_transition_action, TransitionAction, TriggerArgs};
use std::fmt;
use std::sync::Arc;

/// Type alias for handler and listener callables.
///
/// Called with the node the event fired on, the owning machine, and the
/// event arguments.
pub type HandlerFn = Arc<
    dyn Fn(NodeRef<'_>, &mut dyn Machine, &TriggerArgs) -> Result<(), MachineError> + Send + Sync,
>;

/// Listener registered for a named event on a node.
pub type Listener = HandlerFn;

/// A handler declared directly on a state.
///
/// The tree builder looks at the variant: a `Transition` is recorded as an
/// event-transition declaration under its member name *and* kept as a
/// callable handler.
#[derive(Clone)]
pub enum Handler {
    /// Arbitrary user code.
    Plain(HandlerFn),

    /// Transition to a fixed path.
    Transition(TransitionAction),
}

impl Handler {
    /// Wrap a closure as a plain handler.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(NodeRef<'_>, &mut dyn Machine, &TriggerArgs) -> Result<(), MachineError>
            + Send
            + Sync
            + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    /// Shorthand for a transition handler built with
    /// [`make_transition_action`].
    pub fn transition(target: impl Into<String>) -> Self {
        Self::Transition(make_transition_action(target))
    }

    /// Target path, when this handler is a transition.
    pub fn transition_target(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Transition(action) => Some(action.target()),
        }
    }

    /// Run the handler.
    pub fn call(
        &self,
        node: NodeRef<'_>,
        owner: &mut dyn Machine,
        args: &TriggerArgs,
    ) -> Result<(), MachineError> {
        match self {
            Self::Plain(f) => f(node, owner, args),
            Self::Transition(action) => action.invoke(owner, args),
        }
    }
}

impl From<TransitionAction> for Handler {
    fn from(action: TransitionAction) -> Self {
        Self::Transition(action)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Handler::Plain(..)"),
            Self::Transition(action) => f
                .debug_tuple("Handler::Transition")
                .field(&action.target())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_handler_exposes_target() {
        let handler = Handler::transition("a.b");
        assert_eq!(handler.transition_target(), Some("a.b"));
    }

    #[test]
    fn plain_handler_has_no_target() {
        let handler = Handler::new(|_node, _owner, _args| Ok(()));
        assert_eq!(handler.transition_target(), None);
    }

    #[test]
    fn action_converts_into_transition_handler() {
        let handler: Handler = make_transition_action("done").into();
        assert!(matches!(handler, Handler::Transition(_)));
    }

    #[test]
    fn debug_shows_variant() {
        assert_eq!(
            format!("{:?}", Handler::transition("x")),
            "Handler::Transition(\"x\")"
        );
        assert_eq!(
            format!("{:?}", Handler::new(|_, _, _| Ok(()))),
            "Handler::Plain(..)"
        );
    }
}
