//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves settings and opens the metadata source via the engine
//! 2. Collects the batch of units
//! 3. Runs the core operation
//! 4. Formats and displays output
//!
//! Handlers never write files, except `index` writing the file it was
//! asked to write.

mod check;
mod completion;
mod index;
mod show;
mod sort;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use index::index;
pub use show::show;
pub use sort::sort;

use crate::cli::args::{Command, UnitArgs};
use crate::core::config::OutputFormat;
use crate::core::types::UnitId;
use crate::engine::{self, source::DynSource, Context, Settings};
use crate::ui::output::{self, Verbosity};
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Sort(args) => sort::sort(ctx, &args),
        Command::Show(args) => show::show(ctx, &args),
        Command::Check(args) => check::check(ctx, &args),
        Command::Index { output } => index::index(ctx, &output),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Inputs shared by the commands that operate on a batch.
struct Session {
    settings: Settings,
    source: DynSource,
    units: Vec<UnitId>,
    verbosity: Verbosity,
}

impl Session {
    /// Resolve settings, open the source, and collect the batch.
    fn open(ctx: &Context, args: &UnitArgs) -> Result<Self> {
        let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
        let settings = settings(ctx, verbosity)?;

        let from = args.from.as_deref().map(|p| ctx.resolve_path(p));
        let units = engine::collect_units(&args.units, from.as_deref())?;
        let source = engine::open_source(&settings)?;

        Ok(Self {
            settings,
            source,
            units,
            verbosity,
        })
    }

    fn json(&self) -> bool {
        self.settings.format == OutputFormat::Json
    }
}

/// Resolve settings, surfacing config warnings.
fn settings(ctx: &Context, verbosity: Verbosity) -> Result<Settings> {
    let settings = engine::resolve(ctx)?;
    for warning in &settings.warnings {
        output::warn(&warning.message, verbosity);
    }
    Ok(settings)
}
