//! The contract between a state tree and the machine that drives it.

use crate::core::TypeKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors surfaced by an owning machine or by the handlers it runs.
///
/// Nothing in this crate produces these on its own; they flow back out of
/// [`Machine::transition_request`] and out of user handlers, and are
/// propagated unchanged to whoever called [`trigger`](crate::core::StateTree::trigger)
/// or [`TransitionAction::invoke`](crate::effects::TransitionAction::invoke).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MachineError {
    #[error("No state found at path '{target}'")]
    UnknownTarget { target: String },

    #[error("Transition to '{target}' rejected: {reason}")]
    Rejected { target: String, reason: String },

    #[error("Handler for '{event}' failed: {message}")]
    Handler { event: String, message: String },
}

/// A request to move the owning machine to `target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Dotted path of the requested state.
    pub target: String,

    /// Context values handed along with the request, in caller order.
    pub contexts: Vec<Value>,
}

impl TransitionRequest {
    /// Create a request with no context values.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            contexts: Vec::new(),
        }
    }

    /// Attach context values.
    pub fn with_contexts(mut self, contexts: Vec<Value>) -> Self {
        self.contexts = contexts;
        self
    }

    /// Flatten into the ordered sequence `[target, contexts...]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statetree::effects::TransitionRequest;
    /// use serde_json::json;
    ///
    /// let request = TransitionRequest::new("stateTwo").with_contexts(vec![json!(42)]);
    /// assert_eq!(request.to_values(), vec![json!("stateTwo"), json!(42)]);
    /// ```
    pub fn to_values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.contexts.len() + 1);
        values.push(Value::String(self.target.clone()));
        values.extend(self.contexts.iter().cloned());
        values
    }
}

/// The machine that owns a state tree.
///
/// A machine holds the current state and performs the actual enter/exit
/// work. The tree only ever asks it to transition and asks it what kind of
/// machine it is.
///
/// # Example
///
/// ```rust
/// use statetree::core::TypeKey;
/// use statetree::effects::{Machine, MachineError, TransitionRequest};
///
/// struct Door {
///     requested: Vec<String>,
/// }
///
/// impl Machine for Door {
///     fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError> {
///         self.requested.push(request.target);
///         Ok(())
///     }
///
///     fn type_key(&self) -> TypeKey {
///         TypeKey::of::<Self>()
///     }
/// }
/// ```
pub trait Machine {
    /// Execute (or schedule) a transition to `request.target`.
    fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError>;

    /// Stable identity of this machine's *type*.
    ///
    /// Every instance of one machine type must return the same key; path
    /// lookups cached under that key are shared by all of them.
    fn type_key(&self) -> TypeKey;
}
