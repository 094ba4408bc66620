use std::fmt;

use serde_json::{Map as JsonMap, Value as JsonValue};

/// A node's model: a flat mapping from property name to value.
pub type State = JsonMap<String, JsonValue>;

/// Where a state mutation came from.
///
/// Every mutation call site passes one of these explicitly. Remote mutations
/// are rendered but never reported back to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Caused on the client, e.g. by an interaction behavior.
    Local,
    /// Caused by an inbound `properties` message.
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Lifecycle phase of a node.
///
/// `Constructed → Announced → Idle ⇄ Rendering`, with `Mutating` always
/// returning through the render and notify reactions. `Detached` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created but the server has not been told yet.
    Constructed,
    /// A `started` message has been sent for this node.
    Announced,
    /// Waiting for messages or interactions.
    Idle,
    /// A state mutation is being applied.
    Mutating,
    /// The render trigger is running.
    Rendering,
    /// Removed from the tree. Accepts no further dispatch.
    Detached,
}

impl Phase {
    /// Return true if the node can still receive messages.
    pub fn is_live(self) -> bool {
        self != Self::Detached
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Constructed => "constructed",
            Self::Announced => "announced",
            Self::Idle => "idle",
            Self::Mutating => "mutating",
            Self::Rendering => "rendering",
            Self::Detached => "detached",
        };
        f.write_str(s)
    }
}

/// Merge `patch` into `state`, key by key. Returns the number of keys written.
pub fn merge(state: &mut State, patch: &State) -> usize {
    for (k, v) in patch {
        state.insert(k.clone(), v.clone());
    }
    patch.len()
}
