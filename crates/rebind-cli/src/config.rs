//! `rebind.toml` configuration.

use std::path::Path;

use anyhow::Context;
use rebind_sdk::BindingOptions;
use serde::Deserialize;

/// CLI configuration
///
/// ```toml
/// module = "example"
///
/// [bindings]
/// narrowing = "checked"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name the demo entity is installed under
    pub module: String,
    /// Marshaling options for every installed function
    pub bindings: BindingOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module: "example".to_string(),
            bindings: BindingOptions::default(),
        }
    }
}

impl Config {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
