//! Binding options
//!
//! Options are fixed when a module is installed into a host and are handed
//! to every call made through that module's functions.
//!
//! ```toml
//! narrowing = "checked"
//! ```

use serde::{Deserialize, Serialize};

/// How a dynamic integer is narrowed to a smaller native integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Narrowing {
    /// Two's-complement truncation, like an `as` cast. No range validation.
    #[default]
    Wrap,
    /// Out-of-range values are rejected as an argument type mismatch.
    Checked,
}

/// Options applied to every call through an installed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingOptions {
    /// Integer narrowing policy for argument decoding
    pub narrowing: Narrowing,
}

impl BindingOptions {
    /// Options with range-checked integer narrowing
    pub const fn checked() -> Self {
        Self {
            narrowing: Narrowing::Checked,
        }
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wraps() {
        assert_eq!(BindingOptions::default().narrowing, Narrowing::Wrap);
    }

    #[test]
    fn test_parse_checked() {
        let options = BindingOptions::from_toml_str("narrowing = \"checked\"").unwrap();
        assert_eq!(options, BindingOptions::checked());
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let options = BindingOptions::from_toml_str("").unwrap();
        assert_eq!(options, BindingOptions::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(BindingOptions::from_toml_str("narowing = \"wrap\"").is_err());
    }
}
