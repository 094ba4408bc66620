//! Turning server descriptors into live nodes.

use serde_json::Value as JsonValue;

use super::{router, tree::Tree};
use crate::{
    NodeId,
    behavior::BehaviorRegistry,
    builtins,
    descriptor::Descriptor,
    error::Result,
    message::{Message, event},
    node::Node,
    render::RenderMode,
    state::Phase,
};

/// Build a detached node from a descriptor, resolving every behavior name.
///
/// Nothing is inserted into a tree; an unknown behavior name fails with
/// `MalformedDescriptor`.
pub fn prepare(registry: &BehaviorRegistry, d: &Descriptor) -> Result<Node> {
    let mut node = Node::new(d.id.clone(), d.properties.clone(), d.presentation());
    node.handlers = builtins::default_handlers();
    for (method, name) in &d.custom_methods {
        let b = registry.resolve(name, &format!("custom method `{method}`"))?;
        node.handlers.register(method.clone(), b);
    }
    for (interaction, name) in &d.handlers {
        let b = registry.resolve(name, &format!("handler `{interaction}`"))?;
        node.bindings.register(interaction.clone(), b);
    }
    if let Some(name) = &d.render {
        node.render = RenderMode::Override(registry.resolve(name, "render")?);
    }
    Ok(node)
}

/// Reify a descriptor under `parent` and announce it to the server.
///
/// The node stays attached even if the announcement cannot be sent; the send
/// error is returned.
pub fn reify(tree: &mut Tree, d: &Descriptor, parent: NodeId) -> Result<NodeId> {
    let node = prepare(&tree.registry, d)?;
    let id = install(tree, node, parent)?;
    announce(tree, id)?;
    Ok(id)
}

/// Reify a wire descriptor under `parent` and announce it to the server.
pub fn reify_value(tree: &mut Tree, value: &JsonValue, parent: NodeId) -> Result<NodeId> {
    let d = Descriptor::from_value(value)?;
    reify(tree, &d, parent)
}

/// Replace every child of `parent` with one new child per descriptor, in
/// order.
///
/// All descriptors are checked before anything is touched: if one is
/// malformed, the existing children are left as they were. Once checked, the
/// replacement always completes. Every new child is attached before any is
/// announced, and failed announcements do not stop the rest; the first error
/// is returned.
pub fn replace_children(
    tree: &mut Tree,
    parent: NodeId,
    values: &[JsonValue],
) -> Result<Vec<NodeId>> {
    tree.live(parent)?;
    let prepared = values
        .iter()
        .map(|v| Descriptor::from_value(v).and_then(|d| prepare(&tree.registry, &d)))
        .collect::<Result<Vec<_>>>()?;

    let mut first_err = None;
    for child in tree.children_of(parent) {
        if let Err(e) = tree.remove_subtree(child) {
            first_err.get_or_insert(e);
        }
    }
    let ids = prepared
        .into_iter()
        .map(|node| install(tree, node, parent))
        .collect::<Result<Vec<_>>>()?;
    for id in &ids {
        if let Err(e) = announce(tree, *id) {
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(ids), Err)
}

/// Attach a prepared node.
fn install(tree: &mut Tree, node: Node, parent: NodeId) -> Result<NodeId> {
    let id = tree.attach(parent, node)?;
    if let Some(n) = tree.node(id) {
        tracing::debug!(node = %n.id, "reified");
    }
    Ok(id)
}

/// Tell the server a node is ready to receive messages.
///
/// The node counts as announced once its `started` frame is handed to the
/// link, whether or not the send succeeds.
pub(crate) fn announce(tree: &mut Tree, id: NodeId) -> Result<()> {
    tree.live_mut(id)?.phase = Phase::Announced;
    router::deliver_up(tree, id, Message::new(event::STARTED))
}
