//! Core state tree types and lookups.
//!
//! This module contains the structural half of the library:
//! - The [`StateTree`] arena and its [`NodeId`] handles
//! - Upward event resolution via [`resolve`]
//! - Per-owner-type path memoisation in [`PathCache`]
//! - Ownership invariant checks via [`check_integrity`]
//!
//! Nothing here changes the current state of a machine; that happens in
//! the owner, reached through [`crate::effects`].

mod cache;
mod integrity;
mod node;
mod resolver;
mod tree;

pub use cache::{PathCache, TypeKey};
pub use integrity::{check_integrity, IntegrityError};
pub use node::{NodeId, NodeRef};
pub use resolver::{resolve, resolve_source};
pub use tree::{Ancestors, StateTree};
