//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When JSON output is selected, results are machine-readable JSON and
//! are printed even in quiet mode.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::Serialize;

use crate::core::types::{UnitId, UnitMetadata};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a value as pretty JSON (always shown).
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a set of units as `a, b, c`, or `-` when empty.
pub fn format_units(units: &BTreeSet<UnitId>) -> String {
    if units.is_empty() {
        "-".to_string()
    } else {
        units
            .iter()
            .map(UnitId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Format a unit's metadata as an indented block.
pub fn format_metadata(
    unit: &UnitId,
    metadata: &UnitMetadata,
    predecessors: &BTreeSet<UnitId>,
) -> String {
    format!(
        "{unit}\n  order:        {}\n  before:       {}\n  after:        {}\n  predecessors: {}",
        metadata.order,
        format_units(&metadata.before),
        format_units(&metadata.after),
        format_units(predecessors),
    )
}
