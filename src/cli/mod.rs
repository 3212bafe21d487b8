//! cli
//!
//! Command-line interface layer for Precedence.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that resolve their inputs through [`crate::engine`] and run
//! [`crate::core`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell, UnitArgs};

use crate::engine;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.debug);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        index: cli.index.clone(),
        declarations: cli.declarations.clone(),
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install a stderr log subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug
/// output for this crate with `--debug`.
fn init_logging(debug: bool) {
    let fallback = if debug {
        "precedence=debug"
    } else {
        "precedence=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when run from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
