use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    error::{Error, Result},
    state::State,
};

/// Default element tag for descriptors that do not name one.
pub const DEFAULT_TAG: &str = "div";

/// Server-supplied specification of a node.
///
/// Behaviors are selected by name from the client's behavior registry; no
/// executable text travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Node id, unique among its siblings.
    pub id: String,
    /// Initial state.
    #[serde(default)]
    pub properties: State,
    /// Element attributes.
    #[serde(default)]
    pub attributes: JsonMap<String, JsonValue>,
    /// Element style.
    #[serde(default)]
    pub style: JsonMap<String, JsonValue>,
    /// Element tag.
    #[serde(default = "default_tag")]
    pub tag_name: String,
    /// Element class.
    #[serde(default)]
    pub class_name: String,
    /// Body template text, expanded by the renderer against the state.
    #[serde(default)]
    pub template: String,
    /// Re-render whenever the state changes.
    #[serde(default = "default_true")]
    pub render_on_change: bool,
    /// Report local state changes to the server.
    #[serde(default = "default_true")]
    pub notify_server_on_change: bool,
    /// Interaction event name to behavior name.
    #[serde(default)]
    pub handlers: BTreeMap<String, String>,
    /// Render-override behavior name.
    #[serde(default)]
    pub render: Option<String>,
    /// Method name to behavior name; installed as message handlers.
    #[serde(default)]
    pub custom_methods: BTreeMap<String, String>,
}

/// Serde default for `tagName`.
fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

/// Serde default for the boolean switches.
fn default_true() -> bool {
    true
}

impl Descriptor {
    /// A descriptor with only an id; everything else defaulted.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: State::new(),
            attributes: JsonMap::new(),
            style: JsonMap::new(),
            tag_name: default_tag(),
            class_name: String::new(),
            template: String::new(),
            render_on_change: true,
            notify_server_on_change: true,
            handlers: BTreeMap::new(),
            render: None,
            custom_methods: BTreeMap::new(),
        }
    }

    /// Parse a descriptor from a wire value.
    ///
    /// Any shape problem is reported as `MalformedDescriptor`.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::malformed(format!("expected an object, got {value}")));
        }
        let d = Self::deserialize(value).map_err(|e| Error::malformed(e.to_string()))?;
        if d.id.is_empty() {
            return Err(Error::malformed("empty id"));
        }
        Ok(d)
    }

    /// Split off the immutable presentation bag.
    pub fn presentation(&self) -> Presentation {
        Presentation {
            attributes: self.attributes.clone(),
            style: self.style.clone(),
            tag_name: self.tag_name.clone(),
            class_name: self.class_name.clone(),
            template: self.template.clone(),
            render_on_change: self.render_on_change,
            notify_server_on_change: self.notify_server_on_change,
        }
    }
}

/// Presentation config of a node, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Element attributes.
    pub attributes: JsonMap<String, JsonValue>,
    /// Element style.
    pub style: JsonMap<String, JsonValue>,
    /// Element tag.
    pub tag_name: String,
    /// Element class.
    pub class_name: String,
    /// Body template.
    pub template: String,
    /// Re-render on state change.
    pub render_on_change: bool,
    /// Report local state changes upward.
    pub notify_server_on_change: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            attributes: JsonMap::new(),
            style: JsonMap::new(),
            tag_name: default_tag(),
            class_name: String::new(),
            template: String::new(),
            render_on_change: true,
            notify_server_on_change: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_fill_in() {
        let d = Descriptor::from_value(&json!({"id": "a"})).unwrap();
        assert_eq!(d, Descriptor::new("a"));
        assert_eq!(d.tag_name, "div");
        assert!(d.render_on_change);
        assert!(d.notify_server_on_change);
    }

    #[test]
    fn camel_case_fields() {
        let d = Descriptor::from_value(&json!({
            "id": "b",
            "tagName": "button",
            "className": "widget button",
            "renderOnChange": false,
            "notifyServerOnChange": false,
            "handlers": {"click": "report"},
            "render": "noop",
            "customMethods": {"reset": "sync"}
        }))
        .unwrap();
        assert_eq!(d.tag_name, "button");
        assert_eq!(d.class_name, "widget button");
        assert!(!d.render_on_change);
        assert!(!d.notify_server_on_change);
        assert_eq!(d.handlers.get("click").map(String::as_str), Some("report"));
        assert_eq!(d.render.as_deref(), Some("noop"));
        assert_eq!(
            d.custom_methods.get("reset").map(String::as_str),
            Some("sync")
        );
    }

    #[test]
    fn null_render_is_default() {
        let d = Descriptor::from_value(&json!({"id": "c", "render": null})).unwrap();
        assert!(d.render.is_none());
    }

    #[test]
    fn malformed_shapes() {
        for v in [
            json!({}),
            json!({"id": ""}),
            json!({"id": 7}),
            json!("a"),
            json!({"id": "a", "properties": [1, 2]}),
        ] {
            let err = Descriptor::from_value(&v).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDescriptor { .. }),
                "{v} gave {err:?}"
            );
        }
    }
}
