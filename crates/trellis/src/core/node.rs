use crate::{
    NodeId,
    descriptor::Presentation,
    handlers::HandlerTable,
    render::RenderMode,
    state::{Phase, State},
};

/// Core node data stored in the arena.
#[derive(Debug)]
pub struct Node {
    /// Wire id, unique among siblings.
    pub(crate) id: String,

    /// Parent in the arena tree. `None` only for the root and for nodes that
    /// have been detached.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in insertion order.
    pub(crate) children: Vec<NodeId>,

    /// Current model.
    pub(crate) state: State,
    /// Presentation config, fixed at construction.
    pub(crate) presentation: Presentation,

    /// Message behaviors by event.
    pub(crate) handlers: HandlerTable,
    /// Interaction behaviors by event.
    pub(crate) bindings: HandlerTable,
    /// Render trigger.
    pub(crate) render: RenderMode,

    /// Lifecycle phase.
    pub(crate) phase: Phase,
}

impl Node {
    /// Construct a detached node in the `Constructed` phase.
    pub(crate) fn new(id: impl Into<String>, state: State, presentation: Presentation) -> Self {
        Self {
            id: id.into(),
            parent: None,
            children: Vec::new(),
            state,
            presentation,
            handlers: HandlerTable::new(),
            bindings: HandlerTable::new(),
            render: RenderMode::Default,
            phase: Phase::Constructed,
        }
    }

    /// Return the node's wire id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the node's state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Return the node's presentation config.
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Return the node's message handler table.
    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// Return the node's interaction bindings.
    pub fn bindings(&self) -> &HandlerTable {
        &self.bindings
    }

    /// Return the node's render trigger.
    pub fn render_mode(&self) -> RenderMode {
        self.render
    }

    /// Return the node's lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}
