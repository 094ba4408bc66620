//! Message behaviors every node is constructed with.

use crate::{
    Context,
    behavior::Behavior,
    error::{Error, Result},
    handlers::HandlerTable,
    message::{Message, event},
    state::Origin,
};

/// Replace the full child set.
pub const CHILDREN: Behavior = Behavior::new(event::CHILDREN, on_children);
/// Add one child.
pub const APPEND: Behavior = Behavior::new(event::APPEND, on_append);
/// Remove one child.
pub const REMOVE: Behavior = Behavior::new(event::REMOVE, on_remove);
/// Apply style.
pub const CSS: Behavior = Behavior::new(event::CSS, on_css);
/// Apply attributes.
pub const ATTR: Behavior = Behavior::new(event::ATTR, on_attr);
/// Merge authoritative state.
pub const PROPERTIES: Behavior = Behavior::new(event::PROPERTIES, on_properties);

/// All built-in behaviors, keyed by the event they handle.
pub const BUILTINS: &[Behavior] = &[CHILDREN, APPEND, REMOVE, CSS, ATTR, PROPERTIES];

/// A handler table holding the built-in behaviors.
pub fn default_handlers() -> HandlerTable {
    let mut table = HandlerTable::new();
    for b in BUILTINS {
        table.register(b.name, *b);
    }
    table
}

/// Re-render after a structural change. A malformed descriptor changes
/// nothing, so nothing is rendered; any other failure leaves the change applied
/// and the parent is still rendered.
fn rerender<T>(ctx: &mut dyn Context, changed: Result<T>) -> Result<()> {
    match changed {
        Err(e @ Error::MalformedDescriptor { .. }) => Err(e),
        changed => {
            let rendered = ctx.render();
            changed.and(rendered)
        }
    }
}

/// Handler for `children`.
fn on_children(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    tracing::debug!(node = ctx.id(), "children");
    let replaced = ctx.replace_children(msg.require_children()?);
    rerender(ctx, replaced)
}

/// Handler for `append`.
fn on_append(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    tracing::debug!(node = ctx.id(), "append");
    let appended = ctx.append_child(msg.require_child()?);
    rerender(ctx, appended)
}

/// Handler for `remove`.
fn on_remove(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    let child = msg.require_childid()?;
    tracing::debug!(node = ctx.id(), child, "remove");
    ctx.remove_child(child)?;
    ctx.render()
}

/// Handler for `css`.
fn on_css(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    ctx.apply_css(msg.require_css()?)
}

/// Handler for `attr`.
fn on_attr(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    ctx.apply_attr(msg.require_attr()?)
}

/// Handler for `properties`.
fn on_properties(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    ctx.set_state(msg.require_properties()?, Origin::Remote)
}
