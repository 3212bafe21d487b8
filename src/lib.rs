//! Precedence - deterministic activation ordering for configuration units
//!
//! Given a batch of unit ids and per-unit metadata (a numeric order plus
//! `before`/`after` relations), Precedence computes one total activation
//! order that honors every in-batch relation and is identical for identical
//! inputs.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to handlers)
//! - [`engine`] - Resolves configuration, metadata source, and batch
//! - [`core`] - Domain types, metadata sources, and the sorter
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. The same batch and metadata always produce the same order
//! 2. Every unit runs after everything it declares `after`
//! 3. Every unit runs before everything it declares `before`
//! 4. A cycle is reported, never broken silently
//!
//! # Example
//!
//! ```
//! use precedence::core::metadata::IndexSource;
//! use precedence::core::sort::PrioritySorter;
//! use precedence::core::types::{UnitId, UnitMetadata};
//!
//! let id = |s: &str| UnitId::new(s).unwrap();
//! let source = IndexSource::from_entries([
//!     (id("web"), UnitMetadata::default().after(id("json"))),
//!     (id("json"), UnitMetadata::default()),
//! ]);
//!
//! let order = PrioritySorter::new(&source).sort([id("web"), id("json")]).unwrap();
//! assert_eq!(order, vec![id("json"), id("web")]);
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
