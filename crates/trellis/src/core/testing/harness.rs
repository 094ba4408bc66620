use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value as JsonValue;

use super::backend::{Rendered, TestCalls, TestFrames, TestRender, TestTransport};
use crate::{
    NodeId, Tree,
    behavior::BehaviorRegistry,
    config::Config,
    error::{Error, Result},
    message::Message,
    path::Path,
    state::State,
};

/// A tree wired to a [`TestTransport`] and a [`TestRender`]. Tests drive it
/// with JSON literals as if they were the server, then inspect what was sent
/// and rendered.
pub struct Harness {
    /// The tree under test.
    pub tree: Tree,
    /// Frames the tree has sent.
    pub frames: Arc<Mutex<TestFrames>>,
    /// Renderer calls the tree has made.
    pub calls: Arc<Mutex<TestCalls>>,
    /// While set, the transport refuses every frame.
    fail: Arc<Mutex<bool>>,
}

impl Harness {
    /// An open tree with the stock registry and default config.
    pub fn new() -> Result<Self> {
        Self::with_config(BehaviorRegistry::new(), Config::default())
    }

    /// An open tree with an explicit registry and config.
    pub fn with_config(registry: BehaviorRegistry, config: Config) -> Result<Self> {
        let mut h = Self::closed(registry, config)?;
        h.tree.open()?;
        Ok(h)
    }

    /// A tree that has not been opened yet.
    pub fn closed(registry: BehaviorRegistry, config: Config) -> Result<Self> {
        let (frames, transport) = TestTransport::create();
        let (calls, render) = TestRender::create();
        let fail = transport.fail.clone();
        let tree = Tree::with_config(Box::new(transport), Box::new(render), registry, config)?;
        Ok(Self {
            tree,
            frames,
            calls,
            fail,
        })
    }

    /// Push one server frame, given as JSON.
    pub fn inject(&mut self, msg: &JsonValue) -> Result<()> {
        let frame = serde_json::to_vec(msg)?;
        self.tree.receive(&frame)
    }

    /// Make the transport fail every send, or stop failing.
    pub fn fail_sends(&self, on: bool) {
        *self.fail.lock().unwrap_or_else(PoisonError::into_inner) = on;
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<Message> {
        self.lock_frames().messages()
    }

    /// Everything sent so far, forgetting it.
    pub fn take_sent(&mut self) -> Vec<Message> {
        self.lock_frames().take()
    }

    /// Every default render so far.
    pub fn renders(&self) -> Vec<Rendered> {
        self.lock_calls().renders()
    }

    /// Forget recorded renderer calls.
    pub fn clear_renders(&mut self) {
        self.lock_calls().clear();
    }

    /// Resolve a path such as `/topwidget/a`.
    pub fn node(&self, path: &str) -> Result<NodeId> {
        let path = Path::from(path);
        self.tree
            .find(&path)
            .ok_or(Error::NoRouteToNode { path })
    }

    /// State of the node at a path.
    pub fn state(&self, path: &str) -> Result<State> {
        let id = self.node(path)?;
        self.tree
            .node(id)
            .map(|n| n.state().clone())
            .ok_or(Error::NodeNotFound(id))
    }

    /// Wire ids of a node's children, in order.
    pub fn child_ids(&self, path: &str) -> Result<Vec<String>> {
        let id = self.node(path)?;
        Ok(self
            .tree
            .children_of(id)
            .into_iter()
            .filter_map(|c| self.tree.node(c).map(|n| n.id().to_string()))
            .collect())
    }

    /// Lock the frame record.
    fn lock_frames(&self) -> MutexGuard<'_, TestFrames> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the call record.
    fn lock_calls(&self) -> MutexGuard<'_, TestCalls> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::message::event;

    #[test]
    fn drives_a_tree() -> Result<()> {
        let mut h = Harness::new()?;
        let started = h.take_sent();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].event, event::STARTED);

        h.inject(&json!({
            "event": "append",
            "path": ["topwidget"],
            "child": {"id": "a", "properties": {"n": 1}}
        }))?;
        assert_eq!(h.child_ids("/topwidget")?, vec!["a"]);
        assert_eq!(h.state("/topwidget/a")?.get("n"), Some(&json!(1)));
        assert_eq!(h.renders().len(), 1);
        Ok(())
    }
}
