//! Core types for the trellis mirror tree.

// Core modules - public
/// Named behaviors and the registry descriptors select from.
pub mod behavior;
/// Message behaviors every node starts with.
pub mod builtins;
/// Wire encoding.
pub mod codec;
/// Tree configuration.
pub mod config;
/// Server-supplied node descriptors.
pub mod descriptor;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Per-node handler tables.
pub mod handlers;
/// Tracing setup.
pub mod logging;
/// Wire messages.
pub mod message;
/// Node data stored in the arena.
pub mod node;
/// Source-route paths.
pub mod path;
/// Descriptor reification.
pub mod reify;
/// Rendering interfaces.
pub mod render;
/// Upward and downward routing.
pub mod router;
/// Node state, origins and phases.
pub mod state;
/// State mutation and render reactions.
pub mod sync;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The message channel and its outbox.
pub mod transport;

// Core modules - internal
/// Behavior context traits and implementations.
pub mod context;
/// Node ID types.
pub mod id;
/// The tree and its arena.
pub mod tree;

// Public exports from internal modules
pub use context::Context;
pub use id::NodeId;
pub use tree::Tree;
