use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{NodeId, behavior::Behavior, error::Result, node::Node, state::State};

/// How a node turns its state into output.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Hand a [`NodeView`] to the renderer.
    #[default]
    Default,
    /// Run a behavior from the registry instead.
    Override(Behavior),
}

impl RenderMode {
    /// Return true if the node uses the default render.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Everything a renderer needs to draw one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    /// Arena key of the node.
    pub node: NodeId,
    /// Wire id.
    pub id: &'a str,
    /// Element tag.
    pub tag_name: &'a str,
    /// Element class.
    pub class_name: &'a str,
    /// Element attributes.
    pub attributes: &'a JsonMap<String, JsonValue>,
    /// Element style.
    pub style: &'a JsonMap<String, JsonValue>,
    /// Body template.
    pub template: &'a str,
    /// Current state.
    pub state: &'a State,
    /// Children, in order.
    pub children: &'a [NodeId],
}

impl<'a> NodeView<'a> {
    /// Build a view over a node.
    pub fn new(node_id: NodeId, node: &'a Node) -> Self {
        let p = &node.presentation;
        Self {
            node: node_id,
            id: &node.id,
            tag_name: &p.tag_name,
            class_name: &p.class_name,
            attributes: &p.attributes,
            style: &p.style,
            template: &p.template,
            state: &node.state,
            children: &node.children,
        }
    }
}

/// The rendering collaborator. Owns whatever the tree is mirrored into.
pub trait Renderer {
    /// Draw one node.
    fn render(&mut self, view: &NodeView<'_>) -> Result<()>;

    /// Apply style to a node's element.
    fn css(&mut self, node: NodeId, css: &JsonMap<String, JsonValue>) -> Result<()>;

    /// Apply attributes to a node's element.
    fn attr(&mut self, node: NodeId, attr: &JsonMap<String, JsonValue>) -> Result<()>;

    /// A node has been destroyed; drop anything held for it.
    fn remove(&mut self, _node: NodeId) -> Result<()> {
        Ok(())
    }
}

/// A renderer that discards everything.
#[derive(Debug, Default)]
pub struct NullRender;

impl Renderer for NullRender {
    fn render(&mut self, _view: &NodeView<'_>) -> Result<()> {
        Ok(())
    }

    fn css(&mut self, _node: NodeId, _css: &JsonMap<String, JsonValue>) -> Result<()> {
        Ok(())
    }

    fn attr(&mut self, _node: NodeId, _attr: &JsonMap<String, JsonValue>) -> Result<()> {
        Ok(())
    }
}
