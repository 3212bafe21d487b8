//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global and the project file; project
//! values override global ones key by key.
//!
//! # Validation
//!
//! Config values are validated after parsing: paths must be non-empty.
//! Unknown keys and unknown output formats are rejected while parsing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A configuration file.
///
/// # Example
///
/// ```toml
/// index = "meta/index.toml"
/// declarations = "meta/units"
///
/// [output]
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Precomputed metadata index
    pub index: Option<PathBuf>,

    /// Directory of per-unit declarations
    pub declarations: Option<PathBuf>,

    /// Output defaults
    pub output: Option<OutputConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "index path cannot be empty".to_string(),
            ));
        }

        if self
            .declarations
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::InvalidValue(
                "declarations path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths against `base`.
    pub(crate) fn rebase(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| {
            if p.is_relative() && !p.as_os_str().is_empty() {
                base.join(p)
            } else {
                p
            }
        };
        self.index = self.index.map(rebase);
        self.declarations = self.declarations.map(rebase);
        self
    }
}

/// Output defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format ("text" or "json")
    pub format: Option<OutputFormat>,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, one item per line
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}
