//! Trellis: a path-addressed UI mirror tree.
//!
//! A server owns the authoritative model of a user interface and drives a
//! client-side tree of nodes over one bidirectional message channel. The
//! client reifies server descriptors into nodes, routes downward messages by
//! root-first id paths, and reports node events upward with the path
//! accumulated on the way.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Tree`] - The node arena, root, link and renderer for one connection
//! - [`Context`] - What a behavior can see and do on its node
//! - [`behavior::BehaviorRegistry`] - The closed set of behaviors descriptors
//!   may name
//!
//! Embedders implement [`transport::Transport`] and [`render::Renderer`],
//! open the tree, and push inbound frames into [`Tree::receive`].

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core types
pub use core::{Context, NodeId, Tree};
pub use core::{
    behavior, builtins, codec, config, descriptor, dump, error, handlers, logging, message, node,
    path, reify, render, router, state, sync, transport,
};

pub use error::{Error, Result};
