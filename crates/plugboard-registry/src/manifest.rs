//! Declarative plugin manifest.
//!
//! A manifest is the host's activation list: which plugins are on, and the
//! raw string parameters declared for each. It doubles as a
//! [`ParamSource`], so a runtime can be configured straight from a TOML
//! document:
//!
//! ```toml
//! [[plugins]]
//! name = "Shadows"
//! description = "Soft character shadows"
//!
//! [plugins.parameters]
//! Opacity = "0.5"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PluginError, PluginResult};
use crate::source::{ParamBag, ParamSource};

/// A declarative plugin list with per-plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Plugin entries in activation order.
    #[serde(default)]
    pub plugins: Vec<ManifestEntry>,
}

/// One manifest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Plugin name (unique identifier).
    pub name: String,

    /// Whether the plugin is active.
    #[serde(default = "default_status")]
    pub status: bool,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Declared configuration keys and raw string values.
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

fn default_status() -> bool {
    true
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn from_str(text: &str) -> PluginResult<Self> {
        toml::from_str(text).map_err(|err| PluginError::Manifest {
            message: err.to_string(),
        })
    }

    /// Load a manifest from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> PluginResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// First entry with the given name.
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.plugins.iter().find(|entry| entry.name == name)
    }

    /// Whether the named plugin is present and active.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|entry| entry.status)
    }
}

impl ParamSource for Manifest {
    /// Disabled entries expose no parameters.
    fn parameters(&self, plugin: &str) -> Option<ParamBag> {
        self.plugins
            .iter()
            .find(|entry| entry.name == plugin && entry.status)
            .map(|entry| entry.parameters.clone())
    }
}
