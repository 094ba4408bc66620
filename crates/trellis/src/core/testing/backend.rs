use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    NodeId, codec,
    error::{Error, Result},
    message::Message,
    render::{NodeView, Renderer},
    state::State,
    transport::Transport,
};

/// A handle to the frames a [`TestTransport`] has sent.
#[derive(Debug, Default)]
pub struct TestFrames {
    /// Raw frames, oldest first.
    pub frames: Vec<Vec<u8>>,
    /// Number of times the transport was opened.
    pub opened: usize,
}

impl TestFrames {
    /// Decode every frame. Frames that do not decode are skipped.
    pub fn messages(&self) -> Vec<Message> {
        self.frames
            .iter()
            .filter_map(|f| codec::decode(f).ok())
            .collect()
    }

    /// Decode and drain every frame.
    pub fn take(&mut self) -> Vec<Message> {
        let out = self.messages();
        self.frames.clear();
        out
    }

    /// Forget every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Return true if nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A transport for testing, which records every frame sent.
pub struct TestTransport {
    /// Shared record of sent frames.
    pub frames: Arc<Mutex<TestFrames>>,
    /// While set, every send fails.
    pub fail: Arc<Mutex<bool>>,
}

impl TestTransport {
    /// Create returns a `TestFrames` protected by a mutex, and a
    /// `TestTransport` instance. The `TestFrames` can be used to inspect what
    /// was sent.
    pub fn create() -> (Arc<Mutex<TestFrames>>, Self) {
        let frames = Arc::new(Mutex::new(TestFrames::default()));
        let t = Self {
            frames: frames.clone(),
            fail: Arc::new(Mutex::new(false)),
        };
        (frames, t)
    }

    /// Lock the shared record, recovering from a poisoned lock.
    fn record(&self) -> MutexGuard<'_, TestFrames> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for TestTransport {
    fn open(&mut self) -> Result<()> {
        self.record().opened += 1;
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let fail = *self
            .fail
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if fail {
            return Err(Error::Transport("test transport is failing".into()));
        }
        self.record().frames.push(frame.to_vec());
        Ok(())
    }
}

/// One default render, as seen by [`TestRender`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Arena key.
    pub node: NodeId,
    /// Wire id.
    pub id: String,
    /// Element tag.
    pub tag_name: String,
    /// State at render time.
    pub state: State,
    /// Number of children at render time.
    pub children: usize,
}

/// A renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// Default render of a node.
    Render(Rendered),
    /// Style applied.
    Css(NodeId, JsonMap<String, JsonValue>),
    /// Attributes applied.
    Attr(NodeId, JsonMap<String, JsonValue>),
    /// Node destroyed.
    Remove(NodeId),
}

/// A handle to the calls a [`TestRender`] has seen.
#[derive(Debug, Default)]
pub struct TestCalls {
    /// Calls, oldest first.
    pub calls: Vec<RenderCall>,
}

impl TestCalls {
    /// Every default render.
    pub fn renders(&self) -> Vec<Rendered> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Render(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every destroyed node, in destruction order.
    pub fn removed(&self) -> Vec<NodeId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Remove(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Forget every call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

/// A renderer for testing, which records every call.
pub struct TestRender {
    /// Shared record of calls.
    pub calls: Arc<Mutex<TestCalls>>,
}

impl TestRender {
    /// Create returns a `TestCalls` protected by a mutex, and a `TestRender`
    /// instance. The `TestCalls` can be used to inspect what was rendered.
    pub fn create() -> (Arc<Mutex<TestCalls>>, Self) {
        let calls = Arc::new(Mutex::new(TestCalls::default()));
        let r = Self {
            calls: calls.clone(),
        };
        (calls, r)
    }

    /// Record a call.
    fn push(&self, call: RenderCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .push(call);
    }
}

impl Renderer for TestRender {
    fn render(&mut self, view: &NodeView<'_>) -> Result<()> {
        self.push(RenderCall::Render(Rendered {
            node: view.node,
            id: view.id.to_string(),
            tag_name: view.tag_name.to_string(),
            state: view.state.clone(),
            children: view.children.len(),
        }));
        Ok(())
    }

    fn css(&mut self, node: NodeId, css: &JsonMap<String, JsonValue>) -> Result<()> {
        self.push(RenderCall::Css(node, css.clone()));
        Ok(())
    }

    fn attr(&mut self, node: NodeId, attr: &JsonMap<String, JsonValue>) -> Result<()> {
        self.push(RenderCall::Attr(node, attr.clone()));
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        self.push(RenderCall::Remove(node));
        Ok(())
    }
}
