//! Builder API for declaring state trees.
//!
//! A state is described by a [`Declaration`]: an ordered list of named
//! members. [`TreeBuilder`] walks it once and produces a [`StateTree`]:
//!
//! - nested declarations and factories become child states;
//! - transition actions become event transitions *and* handlers;
//! - plain handlers stay handlers;
//! - everything else is kept as a property.
//!
//! [`StateTree`]: crate::core::StateTree

mod declaration;
pub mod macros;
mod tree;

pub use declaration::{ChildSource, Declaration, Member, NodeFactory};
pub use tree::{build_into, TreeBuilder};

pub(crate) use tree::populate;
