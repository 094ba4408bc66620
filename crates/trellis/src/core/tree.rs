use slotmap::SlotMap;

use super::{context::TreeContext, reify, router, sync};
use crate::{
    NodeId,
    behavior::{Behavior, BehaviorRegistry},
    builtins,
    codec,
    config::Config,
    descriptor::Presentation,
    error::{Error, Result},
    message::Message,
    node::Node,
    path::Path,
    render::Renderer,
    state::{Origin, Phase, State},
    transport::{Link, Transport},
};

/// The mirror tree for one connection.
///
/// Owns the node arena, the designated root, the link to the server, the
/// renderer and the behavior registry. All operations run to completion on the
/// calling thread.
pub struct Tree {
    /// Node arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Designated root, created when the tree opens.
    pub(crate) root: Option<NodeId>,
    /// Outbound channel.
    pub(crate) link: Link,
    /// Rendering collaborator.
    pub(crate) renderer: Box<dyn Renderer>,
    /// Behaviors descriptors may refer to.
    pub(crate) registry: BehaviorRegistry,
    /// Configuration.
    pub(crate) config: Config,
}

impl Tree {
    /// Construct a tree with the stock registry and default config.
    pub fn new(transport: Box<dyn Transport>, renderer: Box<dyn Renderer>) -> Self {
        Self::build(
            transport,
            renderer,
            BehaviorRegistry::new(),
            Config::default(),
        )
    }

    /// Construct a tree with an explicit registry and config.
    pub fn with_config(
        transport: Box<dyn Transport>,
        renderer: Box<dyn Renderer>,
        registry: BehaviorRegistry,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(transport, renderer, registry, config))
    }

    /// Assemble the parts.
    fn build(
        transport: Box<dyn Transport>,
        renderer: Box<dyn Renderer>,
        registry: BehaviorRegistry,
        config: Config,
    ) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            link: Link::new(transport, config.outbox_limit),
            renderer,
            registry,
            config,
        }
    }

    /// Open the channel and flush queued frames. The first call also builds
    /// the root, so the tree is routable even if the channel fails to open.
    pub fn open(&mut self) -> Result<()> {
        if self.root.is_none() {
            self.create_root()?;
        }
        self.link.open()
    }

    /// Build the root node. Its announcement waits in the outbox until the link
    /// opens.
    fn create_root(&mut self) -> Result<()> {
        let mut node = Node::new(
            self.config.root_id.clone(),
            State::new(),
            Presentation::default(),
        );
        node.handlers = builtins::default_handlers();
        let root = self.nodes.insert(node);
        self.root = Some(root);
        tracing::debug!(root = %self.config.root_id, "root created");
        if self.config.announce_root {
            reify::announce(self, root)?;
        }
        Ok(())
    }

    /// Mark the channel closed. Upward frames are queued until the next open.
    pub fn close(&mut self) {
        self.link.close();
    }

    /// Is the channel open?
    pub fn is_open(&self) -> bool {
        self.link.is_open()
    }

    /// Number of frames waiting for the channel.
    pub fn pending(&self) -> usize {
        self.link.pending()
    }

    /// The designated root, once the tree has opened.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The behavior registry in use.
    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of a node, in order. Empty for unknown nodes.
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// The first direct child of `parent` with wire id `id`.
    pub fn child_by_id(&self, parent: NodeId, id: &str) -> Option<NodeId> {
        self.nodes.get(parent)?.children.iter().copied().find(|c| {
            self.nodes.get(*c).is_some_and(|n| n.id == id)
        })
    }

    /// Resolve a root-first path to a node.
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        router::resolve(self, self.root?, path).ok()
    }

    /// Root-to-node path of a node.
    pub fn path_of(&self, id: NodeId) -> Result<Path> {
        router::path_of(self, id)
    }

    /// Handle one inbound frame.
    ///
    /// Failures are logged and returned; the tree stays usable for the next
    /// frame.
    pub fn receive(&mut self, frame: &[u8]) -> Result<()> {
        let msg = codec::decode(frame).inspect_err(|e| {
            tracing::warn!(error = %e, "dropping undecodable frame");
        })?;
        self.deliver(&msg)
    }

    /// Route a decoded downward message from the root.
    pub fn deliver(&mut self, msg: &Message) -> Result<()> {
        let ret = match self.root {
            Some(root) => router::deliver_down(self, root, msg),
            None => Err(Error::NoRouteToNode {
                path: msg.path.clone(),
            }),
        };
        ret.inspect_err(|e| {
            tracing::warn!(
                node = msg.path.last().unwrap_or_default(),
                event = %msg.event,
                path = %msg.path,
                error = %e,
                "message failed"
            );
        })
    }

    /// Send a message to the server from a node.
    pub fn send(&mut self, id: NodeId, msg: Message) -> Result<()> {
        router::deliver_up(self, id, msg)
    }

    /// Apply a local state change to a node.
    pub fn set_state(&mut self, id: NodeId, patch: &State) -> Result<()> {
        sync::mutate(self, id, patch, Origin::Local)
    }

    /// Report an interaction on a node's element. Runs the node's bindings for
    /// `interaction.event`.
    pub fn interact(&mut self, id: NodeId, interaction: Message) -> Result<()> {
        let node = self.live(id)?;
        if !node.bindings.has_handler(&interaction.event) {
            return Err(Error::NoHandler {
                node: node.id.clone(),
                event: interaction.event,
            });
        }
        let list = node
            .bindings
            .get(&interaction.event)
            .map(<[Behavior]>::to_vec)
            .unwrap_or_default();
        tracing::trace!(node = %node.id, event = %interaction.event, "interaction");
        self.run(id, &list, &interaction, Origin::Local)
    }

    /// Register a further message behavior on a node. Appends to the list.
    pub fn on(&mut self, id: NodeId, event: &str, behavior: Behavior) -> Result<()> {
        self.live_mut(id)?.handlers.register(event, behavior);
        Ok(())
    }

    /// Register a further interaction behavior on a node. Appends to the list.
    pub fn bind(&mut self, id: NodeId, event: &str, behavior: Behavior) -> Result<()> {
        self.live_mut(id)?.bindings.register(event, behavior);
        Ok(())
    }

    /// Run a node's message behaviors for `msg.event`, in registration order.
    pub(crate) fn dispatch(&mut self, id: NodeId, msg: &Message) -> Result<()> {
        let node = self.live_mut(id)?;
        if !node.handlers.has_handler(&msg.event) {
            return Err(Error::NoHandler {
                node: node.id.clone(),
                event: msg.event.clone(),
            });
        }
        if node.phase == Phase::Announced {
            node.phase = Phase::Idle;
        }
        let list = node
            .handlers
            .get(&msg.event)
            .map(<[Behavior]>::to_vec)
            .unwrap_or_default();
        tracing::trace!(node = %node.id, event = %msg.event, behaviors = list.len(), "dispatch");
        self.run(id, &list, msg, Origin::Remote)
    }

    /// Run behaviors on a node, stopping at the first error.
    fn run(
        &mut self,
        id: NodeId,
        list: &[Behavior],
        msg: &Message,
        origin: Origin,
    ) -> Result<()> {
        for b in list {
            self.live(id)?;
            let mut ctx = TreeContext::new(self, id, origin);
            b.call(&mut ctx, msg)?;
        }
        Ok(())
    }

    /// A node that can still receive messages.
    pub(crate) fn live(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .filter(|n| n.phase.is_live())
            .ok_or(Error::Detached(id))
    }

    /// Mutable access to a node that can still receive messages.
    pub(crate) fn live_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .filter(|n| n.phase.is_live())
            .ok_or(Error::Detached(id))
    }

    /// Insert a node under a parent.
    pub(crate) fn attach(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        self.live(parent)?;
        let child = self.nodes.insert(node);
        if let Some(n) = self.nodes.get_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(n) = self.nodes.get_mut(parent) {
            n.children.push(child);
        }
        self.debug_assert_tree_invariants();
        Ok(child)
    }

    /// Destroy a node and its subtree, post-order, and unlink it from its
    /// parent. The root cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if Some(id) == self.root {
            return Err(Error::Invalid("cannot remove the root".into()));
        }
        let Some(node) = self.nodes.get(id) else {
            return Err(Error::NodeNotFound(id));
        };
        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }

        let mut first_err = None;
        for n in self.subtree_post_order(id) {
            if let Some(node) = self.nodes.get_mut(n) {
                node.phase = Phase::Detached;
                node.parent = None;
                tracing::trace!(node = %node.id, "detached");
            }
            if let Err(e) = self.renderer.remove(n) {
                first_err.get_or_insert(e);
            }
            self.nodes.remove(n);
        }
        self.debug_assert_tree_invariants();
        first_err.map_or(Ok(()), Err)
    }

    /// Node ids of a subtree, children before parents.
    fn subtree_post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((n, expanded)) = stack.pop() {
            if expanded {
                out.push(n);
                continue;
            }
            stack.push((n, true));
            if let Some(node) = self.nodes.get(n) {
                for c in node.children.iter().rev() {
                    stack.push((*c, false));
                }
            }
        }
        out
    }

    /// Assert structural invariants on the node tree in debug builds.
    #[cfg(debug_assertions)]
    fn debug_assert_tree_invariants(&self) {
        for (id, node) in &self.nodes {
            for c in &node.children {
                let child = self.nodes.get(*c);
                debug_assert!(child.is_some(), "dangling child {c:?} under {id:?}");
                debug_assert_eq!(child.and_then(|c| c.parent), Some(id));
            }
            if Some(id) != self.root {
                debug_assert!(node.parent.is_some(), "orphan {id:?}");
            }
        }
    }

    #[cfg(not(debug_assertions))]
    /// Structural checks are compiled out of release builds.
    fn debug_assert_tree_invariants(&self) {}
}
