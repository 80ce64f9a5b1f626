//! Transition actions: callables bound to a fixed target path.

use crate::effects::machine::{Machine, MachineError, TransitionRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A user-interface interaction that triggered an event.
///
/// Views attach the values a transition needs to the event itself as
/// `contexts`; a transition action fired by such an event forwards those
/// instead of the event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiEvent {
    /// Kind of interaction, e.g. `"click"`.
    pub kind: String,

    /// Values attached by the view, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<Value>>,
}

impl UiEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            contexts: None,
        }
    }

    pub fn with_contexts(mut self, contexts: Vec<Value>) -> Self {
        self.contexts = Some(contexts);
        self
    }

    fn to_value(&self) -> Value {
        match &self.contexts {
            Some(contexts) => json!({ "kind": self.kind, "contexts": contexts }),
            None => json!({ "kind": self.kind }),
        }
    }
}

/// Arguments passed along when an event fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TriggerArgs {
    /// A single interaction event.
    Event(UiEvent),

    /// Plain values, in caller order.
    Values(Vec<Value>),
}

impl TriggerArgs {
    /// No arguments at all.
    pub fn none() -> Self {
        Self::Values(Vec::new())
    }

    /// Plain values converted from anything JSON-representable.
    pub fn values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    /// The context list a transition request should carry.
    ///
    /// An event with attached contexts yields a copy of them. Anything else
    /// is taken literally: plain values as they are, an event without
    /// contexts as a single value.
    pub fn contexts(&self) -> Vec<Value> {
        match self {
            Self::Event(UiEvent {
                contexts: Some(contexts),
                ..
            }) => contexts.clone(),
            Self::Event(event) => vec![event.to_value()],
            Self::Values(values) => values.clone(),
        }
    }
}

impl Default for TriggerArgs {
    fn default() -> Self {
        Self::none()
    }
}

impl From<UiEvent> for TriggerArgs {
    fn from(event: UiEvent) -> Self {
        Self::Event(event)
    }
}

impl From<Vec<Value>> for TriggerArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::Values(values)
    }
}

/// A reusable callable that asks the owning machine to go to `target`.
///
/// Declared as a named member of a state, the same value is both an event
/// handler and an event-transition declaration for that name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionAction {
    target: String,
}

impl TransitionAction {
    /// Path this action transitions to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Forward a transition request for [`target`](Self::target) to `owner`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statetree::core::TypeKey;
    /// use statetree::effects::{
    ///     make_transition_action, Machine, MachineError, TransitionRequest, TriggerArgs, UiEvent,
    /// };
    /// use serde_json::json;
    ///
    /// #[derive(Default)]
    /// struct Recorder(Vec<Vec<serde_json::Value>>);
    ///
    /// impl Machine for Recorder {
    ///     fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError> {
    ///         self.0.push(request.to_values());
    ///         Ok(())
    ///     }
    ///     fn type_key(&self) -> TypeKey {
    ///         TypeKey::of::<Self>()
    ///     }
    /// }
    ///
    /// let action = make_transition_action("stateTwo");
    /// let mut machine = Recorder::default();
    ///
    /// let click = UiEvent::new("click").with_contexts(vec![json!(42)]);
    /// action.invoke(&mut machine, &click.into()).unwrap();
    /// action.invoke(&mut machine, &TriggerArgs::values([1, 2, 3])).unwrap();
    ///
    /// assert_eq!(machine.0[0], vec![json!("stateTwo"), json!(42)]);
    /// assert_eq!(machine.0[1], vec![json!("stateTwo"), json!(1), json!(2), json!(3)]);
    /// ```
    pub fn invoke(&self, owner: &mut dyn Machine, args: &TriggerArgs) -> Result<(), MachineError> {
        let request = TransitionRequest::new(self.target.clone()).with_contexts(args.contexts());
        tracing::debug!(target_path = %self.target, contexts = request.contexts.len(), "forwarding transition request");
        owner.transition_request(request)
    }
}

/// Create a transition action bound to `target`.
pub fn make_transition_action(target: impl Into<String>) -> TransitionAction {
    TransitionAction {
        target: target.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeKey;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<TransitionRequest>,
        fail_with: Option<MachineError>,
    }

    impl Machine for Recorder {
        fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError> {
            if let Some(err) = self.fail_with.clone() {
                return Err(err);
            }
            self.requests.push(request);
            Ok(())
        }

        fn type_key(&self) -> TypeKey {
            TypeKey::of::<Self>()
        }
    }

    #[test]
    fn ui_event_contexts_are_forwarded() {
        let action = make_transition_action("stateTwo");
        let mut machine = Recorder::default();
        let args: TriggerArgs = UiEvent::new("click").with_contexts(vec![json!(42)]).into();

        action.invoke(&mut machine, &args).unwrap();

        assert_eq!(
            machine.requests[0].to_values(),
            vec![json!("stateTwo"), json!(42)]
        );
    }

    #[test]
    fn plain_values_are_forwarded_in_order() {
        let action = make_transition_action("stateTwo");
        let mut machine = Recorder::default();

        action
            .invoke(&mut machine, &TriggerArgs::values([1, 2, 3]))
            .unwrap();

        assert_eq!(
            machine.requests[0].to_values(),
            vec![json!("stateTwo"), json!(1), json!(2), json!(3)]
        );
    }

    #[test]
    fn event_without_contexts_is_passed_literally() {
        let action = make_transition_action("next");
        let mut machine = Recorder::default();

        action
            .invoke(&mut machine, &UiEvent::new("keydown").into())
            .unwrap();

        assert_eq!(machine.requests[0].contexts, vec![json!({"kind": "keydown"})]);
    }

    #[test]
    fn contexts_are_copied_not_moved() {
        let args: TriggerArgs = UiEvent::new("click")
            .with_contexts(vec![json!("a"), json!("b")])
            .into();

        let first = args.contexts();
        let second = args.contexts();

        assert_eq!(first, second);
        assert_eq!(first, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn no_arguments_forwards_target_only() {
        let action = make_transition_action("idle");
        let mut machine = Recorder::default();

        action.invoke(&mut machine, &TriggerArgs::none()).unwrap();

        assert_eq!(machine.requests[0].to_values(), vec![json!("idle")]);
    }

    #[test]
    fn owner_errors_propagate() {
        let action = make_transition_action("locked");
        let mut machine = Recorder {
            fail_with: Some(MachineError::UnknownTarget {
                target: "locked".to_string(),
            }),
            ..Recorder::default()
        };

        let result = action.invoke(&mut machine, &TriggerArgs::none());

        assert!(matches!(result, Err(MachineError::UnknownTarget { .. })));
        assert!(machine.requests.is_empty());
    }

    #[test]
    fn action_is_reusable() {
        let action = make_transition_action("b");
        let mut machine = Recorder::default();

        action.invoke(&mut machine, &TriggerArgs::none()).unwrap();
        action.clone().invoke(&mut machine, &TriggerArgs::none()).unwrap();

        assert_eq!(machine.requests.len(), 2);
        assert_eq!(action.target(), "b");
    }
}
