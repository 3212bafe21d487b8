//! index command - Build a precomputed index from declarations

use std::path::Path;

use super::settings;
use crate::core::config::OutputFormat;
use crate::core::metadata::DeclarationSource;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};
use anyhow::{bail, Context as _, Result};
use serde::Serialize;

#[derive(Serialize)]
struct IndexOutput<'a> {
    path: &'a Path,
    units: usize,
}

/// Read every declaration in the configured directory and write them as
/// one index file.
pub fn index(ctx: &Context, output_path: &Path) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let settings = settings(ctx, verbosity)?;

    let Some(dir) = settings.declarations.as_deref() else {
        bail!("no declarations directory configured; pass --declarations or set it in .precedence/config.toml");
    };

    let index = DeclarationSource::new(dir)
        .build_index()
        .with_context(|| format!("Failed to build index from '{}'", dir.display()))?;

    let path = ctx.resolve_path(output_path);
    index.write(&path)?;

    if settings.format == OutputFormat::Json {
        output::json(&IndexOutput {
            path: &path,
            units: index.len(),
        })?;
    } else {
        output::print(
            format!("Wrote {} units to {}", index.len(), path.display()),
            verbosity,
        );
    }

    Ok(())
}
