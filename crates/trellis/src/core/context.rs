use std::sync::LazyLock;

use serde_json::{Map as JsonMap, Value as JsonValue};

use super::{id::NodeId, reify, router, sync, tree::Tree};
use crate::{
    descriptor::Presentation,
    error::{Error, Result},
    message::Message,
    path::Path,
    state::{Origin, State},
};

/// What a behavior can see and do, scoped to the node it runs on.
pub trait Context {
    /// The node the behavior runs on.
    fn node_id(&self) -> NodeId;

    /// The root of the tree.
    fn root_id(&self) -> Option<NodeId>;

    /// Wire id of the current node.
    fn id(&self) -> &str;

    /// Current state of the node.
    fn state(&self) -> &State;

    /// Presentation config of the node.
    fn presentation(&self) -> &Presentation;

    /// How the running behavior was reached: `Remote` for server messages and
    /// render requests, `Local` for interactions.
    fn origin(&self) -> Origin;

    /// Children of the current node in order.
    fn children(&self) -> Vec<NodeId>;

    /// Root-to-node path of the current node.
    fn path(&self) -> Result<Path>;

    /// Mutate state, tagging where the change came from. Fires the render and
    /// notify reactions.
    fn set_state(&mut self, patch: &State, origin: Origin) -> Result<()>;

    /// Send a message to the server from this node.
    fn send(&mut self, msg: Message) -> Result<()>;

    /// Destroy all children and reify one child per descriptor. Nothing changes
    /// if any descriptor is malformed.
    fn replace_children(&mut self, descriptors: &[JsonValue]) -> Result<Vec<NodeId>>;

    /// Reify one child and append it.
    fn append_child(&mut self, descriptor: &JsonValue) -> Result<NodeId>;

    /// Destroy the first child with a matching id.
    fn remove_child(&mut self, child_id: &str) -> Result<()>;

    /// Hand style to the renderer.
    fn apply_css(&mut self, css: &JsonMap<String, JsonValue>) -> Result<()>;

    /// Hand attributes to the renderer.
    fn apply_attr(&mut self, attr: &JsonMap<String, JsonValue>) -> Result<()>;

    /// Run the node's render trigger (default or override).
    fn render(&mut self) -> Result<()>;

    /// Run the default render, bypassing any override.
    fn render_default(&mut self) -> Result<()>;
}

/// Fallback presentation for lookups on nodes that have gone away.
static DETACHED_PRESENTATION: LazyLock<Presentation> = LazyLock::new(Presentation::default);

/// Fallback state for lookups on nodes that have gone away.
static DETACHED_STATE: LazyLock<State> = LazyLock::new(State::new);

/// Context implementation over a live tree.
pub(crate) struct TreeContext<'a> {
    /// The tree being operated on.
    tree: &'a mut Tree,
    /// Node the behavior runs on.
    node_id: NodeId,
    /// Where the triggering message came from.
    origin: Origin,
}

impl<'a> TreeContext<'a> {
    /// Construct a context for a node.
    pub(crate) fn new(tree: &'a mut Tree, node_id: NodeId, origin: Origin) -> Self {
        Self {
            tree,
            node_id,
            origin,
        }
    }
}

impl Context for TreeContext<'_> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> Option<NodeId> {
        self.tree.root_id()
    }

    fn id(&self) -> &str {
        self.tree
            .node(self.node_id)
            .map(|n| n.id())
            .unwrap_or_default()
    }

    fn state(&self) -> &State {
        self.tree
            .node(self.node_id)
            .map(|n| n.state())
            .unwrap_or(&DETACHED_STATE)
    }

    fn presentation(&self) -> &Presentation {
        self.tree
            .node(self.node_id)
            .map(|n| n.presentation())
            .unwrap_or(&DETACHED_PRESENTATION)
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn children(&self) -> Vec<NodeId> {
        self.tree.children_of(self.node_id)
    }

    fn path(&self) -> Result<Path> {
        router::path_of(self.tree, self.node_id)
    }

    fn set_state(&mut self, patch: &State, origin: Origin) -> Result<()> {
        sync::mutate(self.tree, self.node_id, patch, origin)
    }

    fn send(&mut self, msg: Message) -> Result<()> {
        router::deliver_up(self.tree, self.node_id, msg)
    }

    fn replace_children(&mut self, descriptors: &[JsonValue]) -> Result<Vec<NodeId>> {
        reify::replace_children(self.tree, self.node_id, descriptors)
    }

    fn append_child(&mut self, descriptor: &JsonValue) -> Result<NodeId> {
        reify::reify_value(self.tree, descriptor, self.node_id)
    }

    fn remove_child(&mut self, child_id: &str) -> Result<()> {
        let child = self
            .tree
            .child_by_id(self.node_id, child_id)
            .ok_or_else(|| {
                let mut path = self.path().unwrap_or_default();
                path.push_back(child_id);
                Error::NoRouteToNode { path }
            })?;
        self.tree.remove_subtree(child)
    }

    fn apply_css(&mut self, css: &JsonMap<String, JsonValue>) -> Result<()> {
        self.tree.live(self.node_id)?;
        self.tree.renderer.css(self.node_id, css)
    }

    fn apply_attr(&mut self, attr: &JsonMap<String, JsonValue>) -> Result<()> {
        self.tree.live(self.node_id)?;
        self.tree.renderer.attr(self.node_id, attr)
    }

    fn render(&mut self) -> Result<()> {
        sync::render(self.tree, self.node_id)
    }

    fn render_default(&mut self) -> Result<()> {
        sync::render_default(self.tree, self.node_id)
    }
}
