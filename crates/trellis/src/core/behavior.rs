use std::{collections::HashMap, fmt};

use crate::{
    Context,
    error::{Error, Result},
    message::Message,
};

/// Erased behavior entrypoint.
///
/// A behavior receives the node it runs on through `ctx` and the full message
/// (or interaction, or render request) that triggered it.
pub type BehaviorFn = fn(ctx: &mut dyn Context, msg: &Message) -> Result<()>;

/// A named unit of client-side behavior.
#[derive(Clone, Copy)]
pub struct Behavior {
    /// Registry name; this is what descriptors refer to.
    pub name: &'static str,
    /// Entrypoint.
    pub invoke: BehaviorFn,
}

impl Behavior {
    /// Construct a behavior.
    pub const fn new(name: &'static str, invoke: BehaviorFn) -> Self {
        Self { name, invoke }
    }

    /// Run the behavior.
    pub fn call(&self, ctx: &mut dyn Context, msg: &Message) -> Result<()> {
        (self.invoke)(ctx, msg)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Behavior").field(&self.name).finish()
    }
}

/// Forward an interaction to the server as a message named after it.
pub const REPORT: Behavior = Behavior::new("report", report);
/// Merge the message's `properties` into the node state. The change is local
/// only when the behavior was reached through an interaction.
pub const SYNC: Behavior = Behavior::new("sync", sync);
/// Trace the message and do nothing else.
pub const LOG: Behavior = Behavior::new("log", log);
/// Do nothing. As a render override this suppresses rendering.
pub const NOOP: Behavior = Behavior::new("noop", noop);

/// Stock behaviors available in every registry.
pub const STOCK: &[Behavior] = &[REPORT, SYNC, LOG, NOOP];

/// Implementation of [`REPORT`].
fn report(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    let mut out = Message::new(msg.event.clone());
    out.properties = msg.properties.clone();
    out.extra = msg.extra.clone();
    ctx.send(out)
}

/// Implementation of [`SYNC`].
fn sync(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    let patch = msg.require_properties()?;
    let origin = ctx.origin();
    ctx.set_state(patch, origin)
}

/// Implementation of [`LOG`].
fn log(ctx: &mut dyn Context, msg: &Message) -> Result<()> {
    tracing::info!(node = ctx.id(), event = %msg.event, "{msg:?}");
    Ok(())
}

/// Implementation of [`NOOP`].
fn noop(_ctx: &mut dyn Context, _msg: &Message) -> Result<()> {
    Ok(())
}

/// The closed set of behaviors a server may select by name.
#[derive(Debug, Clone)]
pub struct BehaviorRegistry {
    /// Behaviors by name.
    behaviors: HashMap<&'static str, Behavior>,
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        let mut behaviors = HashMap::new();
        for b in STOCK {
            behaviors.insert(b.name, *b);
        }
        Self { behaviors }
    }
}

impl BehaviorRegistry {
    /// A registry holding only the stock behaviors.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no behaviors at all.
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// Add a behavior. Names are unique; re-registering is an error.
    pub fn register(&mut self, behavior: Behavior) -> Result<()> {
        if self.behaviors.contains_key(behavior.name) {
            return Err(Error::DuplicateBehavior(behavior.name.to_string()));
        }
        self.behaviors.insert(behavior.name, behavior);
        Ok(())
    }

    /// Add several behaviors.
    pub fn add(&mut self, behaviors: &[Behavior]) -> Result<()> {
        for b in behaviors {
            self.register(*b)?;
        }
        Ok(())
    }

    /// Look up a behavior by name.
    pub fn get(&self, name: &str) -> Option<Behavior> {
        self.behaviors.get(name).copied()
    }

    /// Look up a behavior a descriptor refers to.
    pub(crate) fn resolve(&self, name: &str, what: &str) -> Result<Behavior> {
        self.get(name)
            .ok_or_else(|| Error::malformed(format!("{what} refers to unknown behavior `{name}`")))
    }

    /// Iterate over registered names.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.behaviors.keys().copied()
    }
}
