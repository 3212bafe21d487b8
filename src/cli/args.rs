//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--index <file>`: Precomputed metadata index
//! - `--declarations <dir>`: Directory of per-unit declarations
//! - `--json`: Machine-readable output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Precedence - deterministic activation ordering for configuration units
#[derive(Parser, Debug)]
#[command(name = "prec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if prec was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Precomputed metadata index (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub index: Option<PathBuf>,

    /// Directory of per-unit declarations (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub declarations: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Units to operate on, from arguments and/or a file.
#[derive(Args, Debug, Clone, Default)]
pub struct UnitArgs {
    /// Unit ids
    #[arg(value_name = "UNIT")]
    pub units: Vec<String>,

    /// Read unit ids from a file, one per line ('#' starts a comment)
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sort units into activation order
    #[command(
        name = "sort",
        long_about = "Sort units into activation order.\n\n\
            Units are ordered alphabetically, then by their declared numeric order \
            (lower runs earlier), then rearranged so every unit runs after the units \
            it declares 'after' and before the units it declares 'before'. \
            A cycle among the declarations is an error and prints no order.",
        after_help = "\
EXAMPLES:
    # Sort three units using the configured metadata
    prec sort com.example.Web com.example.Jackson com.example.Servlet

    # Sort every unit listed in a file, reading a precomputed index
    prec --index meta/index.toml sort --from units.txt

    # Machine-readable output
    prec --json sort --from units.txt"
    )]
    Sort(UnitArgs),

    /// Show metadata and effective predecessors of units
    #[command(
        name = "show",
        long_about = "Show the declared order, before/after relations, and effective \
            predecessors of each unit.\n\n\
            Effective predecessors are computed within the given units: a unit's own \
            'after' set plus every given unit that declares it in 'before'."
    )]
    Show(UnitArgs),

    /// Report cycles and references to units outside the batch
    #[command(
        name = "check",
        long_about = "Check that units can be ordered.\n\n\
            Reports a cycle if one exists (exit status 1), and lists before/after \
            references to units outside the batch. Such references never affect \
            ordering, but often point at a misspelled unit id."
    )]
    Check(UnitArgs),

    /// Build a precomputed index from a declarations directory
    #[command(name = "index")]
    Index {
        /// Where to write the index
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["prec", "sort", "a", "b", "--json", "--index", "i.toml"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.index, Some(PathBuf::from("i.toml")));
        match cli.command {
            Command::Sort(args) => assert_eq!(args.units, vec!["a", "b"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn index_requires_output() {
        assert!(Cli::try_parse_from(["prec", "index"]).is_err());
    }
}
