use serde::Deserialize;

use crate::error::{Error, Result};

/// Tree configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Wire id of the root node.
    pub root_id: String,
    /// Longest path accepted on downward messages.
    pub max_depth: usize,
    /// Frames held while the channel is closed. Oldest are dropped past this.
    pub outbox_limit: usize,
    /// Send `started` for the root when the tree opens.
    pub announce_root: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_id: "topwidget".into(),
            max_depth: 256,
            outbox_limit: 1024,
            announce_root: true,
        }
    }
}

impl Config {
    /// Parse and validate a TOML config. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let c: Self = toml::from_str(s)?;
        c.validate()?;
        Ok(c)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.root_id.is_empty() {
            return Err(Error::Config("root_id must not be empty".into()));
        }
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".into()));
        }
        if self.outbox_limit == 0 {
            return Err(Error::Config("outbox_limit must be at least 1".into()));
        }
        Ok(())
    }
}
