//! Tracing setup for embedders.

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Error, Result};

/// Install a global fmt subscriber.
///
/// `filter` uses `EnvFilter` directive syntax; when `None`, `RUST_LOG` is used,
/// and when that is unset too, only warnings are shown. Fails if a global
/// subscriber is already installed.
pub fn init(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).map_err(|e| Error::Config(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Config(e.to_string()))
}
