//! Statetree: the node layer of a hierarchical state machine
//!
//! Statetree models the *shape* of a hierarchical state machine and answers
//! questions about it. The machine that owns the tree holds the current
//! state and performs transitions; the tree tells it where things are and
//! where events lead.
//!
//! # Core Concepts
//!
//! - **State tree**: an arena of named states addressed by dotted paths
//! - **Declarations**: ordered, loosely typed descriptions built into a tree
//! - **Event resolution**: the nearest ancestor declaring an event wins
//! - **Path cache**: lookups memoised per owning machine *type*
//! - **Transition actions**: callables that forward a transition request
//!   to the owning machine
//!
//! # Example
//!
//! ```rust
//! use statetree::builder::{Declaration, TreeBuilder};
//! use statetree::core::{resolve, TypeKey};
//! use statetree::effects::{Machine, MachineError, TransitionRequest, TriggerArgs};
//!
//! struct Player {
//!     current: String,
//! }
//!
//! impl Machine for Player {
//!     fn transition_request(&mut self, request: TransitionRequest) -> Result<(), MachineError> {
//!         self.current = request.target;
//!         Ok(())
//!     }
//!
//!     fn type_key(&self) -> TypeKey {
//!         TypeKey::of::<Self>()
//!     }
//! }
//!
//! let tree = TreeBuilder::new().build(
//!     Declaration::new()
//!         .transition("stop", "stopped")
//!         .state("stopped", Declaration::new().transition("play", "playing"))
//!         .state(
//!             "playing",
//!             Declaration::new()
//!                 .state("normal", Declaration::new())
//!                 .state("fast", Declaration::new()),
//!         ),
//! );
//!
//! let fast = tree.find("playing.fast").unwrap();
//! assert_eq!(resolve(&tree, fast, "stop"), Some("stopped"));
//!
//! let mut player = Player { current: "playing.fast".to_string() };
//! tree.trigger(tree.root(), "stop", &mut player, &TriggerArgs::none()).unwrap();
//! assert_eq!(player.current, "stopped");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use builder::{Declaration, TreeBuilder};
pub use config::TreeConfig;
pub use crate::core::{resolve, NodeId, PathCache, StateTree, TypeKey};
pub use effects::{make_transition_action, Handler, Machine, MachineError, TransitionAction};
