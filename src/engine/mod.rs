//! engine
//!
//! Resolves what a command runs against: configuration, metadata source,
//! and the batch of units.
//!
//! # Architecture
//!
//! Every command follows the same lifecycle:
//!
//! ```text
//! Context -> Resolve settings -> Open source -> Collect batch -> Run core
//! ```
//!
//! 1. **Context**: global flags from the CLI
//! 2. **Resolve**: merge flags over project and global config
//! 3. **Open source**: index, declarations, or both layered
//! 4. **Collect batch**: unit ids from arguments and `--from` files
//! 5. **Run**: hand the batch to [`crate::core`]
//!
//! # Invariants
//!
//! - CLI flags always take precedence over config files
//! - Relative flag paths resolve against `--cwd` when given
//! - The engine never writes anything except an explicitly requested index

pub mod batch;
pub mod source;

pub use batch::{collect_units, parse_unit_list};
pub use source::open_source;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::config::{Config, ConfigError, ConfigWarning, OutputFormat};
use crate::core::metadata::{IndexError, MetadataError};
use crate::core::types::TypeError;

/// Errors from resolving a command's inputs.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no metadata source configured; pass --index or --declarations, or set them in .precedence/config.toml")]
    NoSource,

    #[error("no units given; pass unit ids or --from <file>")]
    EmptyBatch,

    #[error("failed to read unit list '{path}': {source}")]
    ReadUnits {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: {source}")]
    InvalidUnit {
        path: PathBuf,
        line: usize,
        source: TypeError,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Index path from the command line.
    pub index: Option<PathBuf>,
    /// Declarations directory from the command line.
    pub declarations: Option<PathBuf>,
    /// JSON output requested on the command line.
    pub json: bool,
}

impl Context {
    /// The directory commands run in.
    pub fn work_dir(&self) -> PathBuf {
        match &self.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Resolve `path` against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.work_dir().join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Settings after merging flags over configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Index to read, if any.
    pub index: Option<PathBuf>,
    /// Declarations directory to read, if any.
    pub declarations: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Warnings from config loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolve settings for `ctx` from configuration files.
pub fn resolve(ctx: &Context) -> Result<Settings, EngineError> {
    let loaded = Config::load(Some(&ctx.work_dir()))?;
    Ok(resolve_with(ctx, &loaded.config, loaded.warnings))
}

/// Merge `ctx` flags over an already loaded `config`.
pub fn resolve_with(ctx: &Context, config: &Config, warnings: Vec<ConfigWarning>) -> Settings {
    let index = ctx
        .index
        .as_deref()
        .map(|p| ctx.resolve_path(p))
        .or_else(|| config.index().map(Path::to_path_buf));

    let declarations = ctx
        .declarations
        .as_deref()
        .map(|p| ctx.resolve_path(p))
        .or_else(|| config.declarations().map(Path::to_path_buf));

    let format = if ctx.json {
        OutputFormat::Json
    } else {
        config.output_format()
    };

    debug!(index = ?index, declarations = ?declarations, format = ?format, "resolved settings");

    Settings {
        index,
        declarations,
        format,
        warnings,
    }
}
