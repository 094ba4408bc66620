use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    error::{Error, Result},
    path::Path,
    state::State,
};

/// Well-known event names.
pub mod event {
    /// Upward: a node is ready to receive messages.
    pub const STARTED: &str = "started";
    /// Downward: replace the full child set.
    pub const CHILDREN: &str = "children";
    /// Downward: add one child.
    pub const APPEND: &str = "append";
    /// Downward: remove one child by id.
    pub const REMOVE: &str = "remove";
    /// Downward: apply style to the node's element.
    pub const CSS: &str = "css";
    /// Downward: apply attributes to the node's element.
    pub const ATTR: &str = "attr";
    /// Downward: merge authoritative state.
    pub const PROPERTIES: &str = "properties";
    /// Upward: a local state change, carrying the full state.
    pub const CHANGE: &str = "change";
    /// Synthetic event passed to render-override behaviors.
    pub const RENDER: &str = "render";
}

/// A wire message, in either direction.
///
/// Only `event` is always present. The remaining fields depend on the event;
/// top-level fields this type does not know about are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message kind.
    pub event: String,
    /// Originating node id on upward messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Source route, root first.
    #[serde(default)]
    pub path: Path,
    /// Descriptors for a `children` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<JsonValue>>,
    /// Descriptor for an `append` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<JsonValue>,
    /// Child id for a `remove` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub childid: Option<String>,
    /// Style for a `css` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<JsonMap<String, JsonValue>>,
    /// Attributes for an `attr` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<JsonMap<String, JsonValue>>,
    /// State for `properties` and `change` messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<State>,
    /// Any other payload fields.
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl Message {
    /// Construct an empty message for an event.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    /// Set the path.
    pub fn with_path(mut self, path: impl Into<Path>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the `properties` payload.
    pub fn with_properties(mut self, properties: State) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Add an extra payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The `children` payload, or an error naming the missing field.
    pub fn require_children(&self) -> Result<&[JsonValue]> {
        self.children
            .as_deref()
            .ok_or_else(|| self.missing("children"))
    }

    /// The `child` payload.
    pub fn require_child(&self) -> Result<&JsonValue> {
        self.child.as_ref().ok_or_else(|| self.missing("child"))
    }

    /// The `childid` payload.
    pub fn require_childid(&self) -> Result<&str> {
        self.childid.as_deref().ok_or_else(|| self.missing("childid"))
    }

    /// The `css` payload.
    pub fn require_css(&self) -> Result<&JsonMap<String, JsonValue>> {
        self.css.as_ref().ok_or_else(|| self.missing("css"))
    }

    /// The `attr` payload.
    pub fn require_attr(&self) -> Result<&JsonMap<String, JsonValue>> {
        self.attr.as_ref().ok_or_else(|| self.missing("attr"))
    }

    /// The `properties` payload.
    pub fn require_properties(&self) -> Result<&State> {
        self.properties
            .as_ref()
            .ok_or_else(|| self.missing("properties"))
    }

    /// Build the error for a missing payload field.
    fn missing(&self, field: &str) -> Error {
        Error::Invalid(format!(
            "{} message at {} has no `{field}` field",
            self.event, self.path
        ))
    }
}
