//! The effectful edge of the tree: handlers, transition actions, and the
//! owning machine they talk to.
//!
//! The tree itself never changes the current state. Everything that does
//! goes through a [`Machine`], either from a plain [`Handler`] or from a
//! [`TransitionAction`] that forwards a [`TransitionRequest`].
//!
//! # Key Concepts
//!
//! - **Machine**: the owner holding current state, identified by [`TypeKey`](crate::core::TypeKey)
//! - **Transition actions**: callables bound to a target path
//! - **Trigger arguments**: either a UI event carrying contexts or plain values

mod handler;
mod machine;
mod transition;

pub use handler::{Handler, HandlerFn, Listener};
pub use machine::{Machine, MachineError, TransitionRequest};
pub use transition::{make_transition_action, TransitionAction, TriggerArgs, UiEvent};
