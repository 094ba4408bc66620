//! State mutation and its reactions.
//!
//! Every mutation carries an [`Origin`]. After the merge, two reactions fire:
//! the render trigger when the node renders on change, and one upward `change`
//! message carrying the full state when the node notifies on change and the
//! mutation did not come from the server.

use super::{context::TreeContext, router, tree::Tree};
use crate::{
    NodeId,
    error::{Error, Result},
    message::{Message, event},
    render::{NodeView, RenderMode},
    state::{self, Origin, Phase},
};

/// Merge `patch` into a node's state and run the reactions.
///
/// Both reactions run even if the first fails; the first error is returned.
/// A mutation made while the node renders skips the render reaction.
pub fn mutate(tree: &mut Tree, id: NodeId, patch: &state::State, origin: Origin) -> Result<()> {
    let node = tree.live_mut(id)?;
    let prev = node.phase;
    node.phase = Phase::Mutating;
    let keys = state::merge(&mut node.state, patch);
    let render_on_change = node.presentation.render_on_change;
    let notify = node.presentation.notify_server_on_change && origin != Origin::Remote;
    tracing::trace!(node = %node.id, %origin, keys, "mutate");

    let rendered = if render_on_change && prev != Phase::Rendering {
        render(tree, id)
    } else {
        Ok(())
    };
    let notified = if notify { notify_change(tree, id) } else { Ok(()) };
    settle(tree, id, prev);
    rendered.and(notified)
}

/// Send one `change` message carrying the node's full state.
fn notify_change(tree: &mut Tree, id: NodeId) -> Result<()> {
    let state = tree.live(id)?.state.clone();
    router::deliver_up(tree, id, Message::new(event::CHANGE).with_properties(state))
}

/// Run a node's render trigger.
///
/// With an override, the behavior receives a `render` message whose
/// `properties` is a snapshot of the current state. The override runs with
/// `Remote` origin. A node that is already rendering is not rendered again,
/// so state an override merges does not re-trigger it.
pub fn render(tree: &mut Tree, id: NodeId) -> Result<()> {
    let node = tree.live_mut(id)?;
    let prev = node.phase;
    if prev == Phase::Rendering {
        tracing::trace!(node = %node.id, "already rendering");
        return Ok(());
    }
    let mode = node.render;
    node.phase = Phase::Rendering;
    let ret = match mode {
        RenderMode::Default => draw(tree, id),
        RenderMode::Override(b) => {
            let msg = Message::new(event::RENDER).with_properties(node.state.clone());
            let mut ctx = TreeContext::new(tree, id, Origin::Remote);
            b.call(&mut ctx, &msg)
        }
    };
    settle(tree, id, prev);
    ret
}

/// Run the default render, bypassing any override.
pub fn render_default(tree: &mut Tree, id: NodeId) -> Result<()> {
    let node = tree.live_mut(id)?;
    let prev = node.phase;
    node.phase = Phase::Rendering;
    let ret = draw(tree, id);
    settle(tree, id, prev);
    ret
}

/// Hand a node's view to the renderer.
fn draw(tree: &mut Tree, id: NodeId) -> Result<()> {
    let node = tree.nodes.get(id).ok_or(Error::Detached(id))?;
    tree.renderer.render(&NodeView::new(id, node))
}

/// Leave a transient phase. Nested mutations and renders return to the phase
/// of the enclosing operation.
fn settle(tree: &mut Tree, id: NodeId, prev: Phase) {
    if let Some(node) = tree.nodes.get_mut(id)
        && node.phase.is_live()
    {
        node.phase = match prev {
            Phase::Mutating | Phase::Rendering => prev,
            _ => Phase::Idle,
        };
    }
}
