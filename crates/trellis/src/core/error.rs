use std::result::Result as StdResult;

use thiserror::Error;

use crate::{NodeId, path::Path};

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Every variant is local to the single message or call that produced it: the
/// tree stays usable and later messages are processed normally.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A message or interaction arrived for an event the node has no behavior for.
    #[error("no handler for event \"{event}\" on node {node}")]
    NoHandler {
        /// Id of the receiving node.
        node: String,
        /// Event name that was not registered.
        event: String,
    },

    /// A downward path does not resolve to a live node.
    #[error("no route to node: {path}")]
    NoRouteToNode {
        /// The path as it was received.
        path: Path,
    },

    /// Upward delivery reached a node with no parent that is not the root.
    #[error("broken route: node {node} has no parent and is not the root")]
    BrokenRoute {
        /// Id of the orphaned node.
        node: String,
    },

    /// A descriptor could not be turned into a node.
    #[error("malformed descriptor: {reason}")]
    MalformedDescriptor {
        /// What was wrong with the descriptor.
        reason: String,
    },

    /// The node has been removed from the tree.
    #[error("node {0:?} is detached")]
    Detached(NodeId),

    /// The node key does not exist in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A behavior name was registered twice.
    #[error("duplicate behavior: {0}")]
    DuplicateBehavior(String),

    #[error("codec: {0}")]
    /// Wire encoding or decoding failure.
    Codec(String),

    #[error("transport: {0}")]
    /// Transport failure.
    Transport(String),

    #[error("render: {0}")]
    /// Rendering failure.
    Render(String),

    #[error("config: {0}")]
    /// Configuration failure.
    Config(String),

    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl Error {
    /// Construct a malformed-descriptor error.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            reason: reason.into(),
        }
    }
}
