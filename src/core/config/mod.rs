//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Precedence has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Settings for the directory being worked in
//!
//! # Resolution
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! Relative paths in a file resolve against the directory holding that file.
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$PRECEDENCE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/precedence/config.toml`
//! 3. `~/.precedence/config.toml`
//!
//! # Project Config Locations
//!
//! Searched in order:
//! 1. `.precedence/config.toml` (canonical)
//! 2. `precedence.toml` (ignored with a warning if the canonical file exists)
//!
//! # Example
//!
//! ```no_run
//! use precedence::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! if let Some(index) = config.index() {
//!     println!("Index: {}", index.display());
//! }
//! println!("Format: {:?}", config.output_format());
//! ```

pub mod schema;

pub use schema::{ConfigFile, OutputConfig, OutputFormat};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "PRECEDENCE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically: project config
/// overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Project configuration (if found)
    pub project: Option<ConfigFile>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads project config from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(Self::find_global().as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file and project directory.
    ///
    /// A `global` path that does not exist is treated as absent.
    pub fn load_from(
        global: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match global.filter(|p| p.exists()) {
            Some(path) => (Self::read_config(path)?, Some(path.to_path_buf())),
            None => (ConfigFile::default(), None),
        };

        let (project, project_path) = match project_dir {
            Some(dir) => Self::load_project(dir, &mut warnings)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        debug!(
            global = ?global_path,
            project = ?project_path,
            "loaded configuration"
        );

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("precedence/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".precedence/config.toml"))
            .filter(|path| path.exists())
    }

    /// Load project configuration from standard locations.
    fn load_project(
        dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<ConfigFile>, Option<PathBuf>), ConfigError> {
        let canonical = Self::project_config_path(dir);
        let shorthand = dir.join("precedence.toml");

        if canonical.exists() {
            if shorthand.exists() {
                warnings.push(ConfigWarning {
                    message: format!(
                        "Ignoring '{}' because '{}' exists",
                        shorthand.display(),
                        canonical.display()
                    ),
                    path: shorthand,
                });
            }
            let config = Self::read_config(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        if shorthand.exists() {
            let config = Self::read_config(&shorthand)?;
            return Ok((Some(config), Some(shorthand)));
        }

        Ok((None, None))
    }

    /// Read and parse a config file, resolving its relative paths.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.rebase(base))
    }

    /// Get the canonical path for project config.
    ///
    /// Returns `.precedence/config.toml` relative to the given directory.
    pub fn project_config_path(dir: &Path) -> PathBuf {
        dir.join(".precedence/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the metadata index path.
    ///
    /// Returns `None` if not configured.
    pub fn index(&self) -> Option<&Path> {
        self.project
            .as_ref()
            .and_then(|p| p.index.as_deref())
            .or(self.global.index.as_deref())
    }

    /// Get the declarations directory.
    ///
    /// Returns `None` if not configured.
    pub fn declarations(&self) -> Option<&Path> {
        self.project
            .as_ref()
            .and_then(|p| p.declarations.as_deref())
            .or(self.global.declarations.as_deref())
    }

    /// Get the output format.
    ///
    /// Defaults to text if not configured.
    pub fn output_format(&self) -> OutputFormat {
        let format_of = |file: &ConfigFile| file.output.as_ref().and_then(|o| o.format);
        self.project
            .as_ref()
            .and_then(format_of)
            .or_else(|| format_of(&self.global))
            .unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(dir: &Path, contents: &str) -> PathBuf {
        let path = Config::project_config_path(dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(None, Some(temp.path())).unwrap();
        let config = result.config;

        assert!(config.index().is_none());
        assert!(config.declarations().is_none());
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(config.global_config_loaded_from().is_none());
        assert!(config.project_config_loaded_from().is_none());
    }

    #[test]
    fn missing_global_file_is_absent() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(Some(&temp.path().join("none.toml")), None).unwrap();
        assert!(result.config.global_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_resolves_relative_paths() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(&global, "index = \"meta/index.toml\"\n").unwrap();

        let result = Config::load_from(Some(&global), None).unwrap();
        assert_eq!(
            result.config.index(),
            Some(temp.path().join("meta/index.toml").as_path())
        );
    }

    #[test]
    fn load_project_config() {
        let temp = TempDir::new().unwrap();
        write_project(
            temp.path(),
            r#"
            declarations = "/abs/units"

            [output]
            format = "json"
            "#,
        );

        let result = Config::load_from(None, Some(temp.path())).unwrap();
        let config = result.config;

        assert_eq!(config.declarations(), Some(Path::new("/abs/units")));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn shorthand_project_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("precedence.toml"), "index = \"i.toml\"\n").unwrap();

        let result = Config::load_from(None, Some(temp.path())).unwrap();
        assert_eq!(
            result.config.index(),
            Some(temp.path().join("i.toml").as_path())
        );
    }

    #[test]
    fn both_project_files_warns() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "index = \"canonical.toml\"\n");
        fs::write(temp.path().join("precedence.toml"), "index = \"short.toml\"\n").unwrap();

        let result = Config::load_from(None, Some(temp.path())).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("Ignoring"));
        assert!(result
            .config
            .index()
            .unwrap()
            .ends_with("canonical.toml"));
    }

    #[test]
    fn project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            "index = \"/global/index.toml\"\ndeclarations = \"/global/units\"\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let project = temp.path().join("project");
        write_project(&project, "index = \"/project/index.toml\"\n");

        let config = Config::load_from(Some(&global), Some(&project))
            .unwrap()
            .config;

        assert_eq!(config.index(), Some(Path::new("/project/index.toml")));
        assert_eq!(config.declarations(), Some(Path::new("/global/units")));
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "index = \"a\"\nunknown_field = true\n");

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn empty_path_rejected() {
        let temp = TempDir::new().unwrap();
        write_project(temp.path(), "declarations = \"\"\n");

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
