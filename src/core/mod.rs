//! core
//!
//! Core domain types, metadata sources, and the ordering algorithm.
//!
//! # Modules
//!
//! - [`types`] - Strong types: UnitId, Order, UnitMetadata
//! - [`metadata`] - Metadata sources (index, declarations, layering, caching)
//! - [`view`] - Per-sort memoized view of unit metadata
//! - [`sort`] - Priority and before/after constraint sorting
//! - [`check`] - Read-only diagnosis of a batch
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Sorting is deterministic and never returns a partial order

pub mod check;
pub mod config;
pub mod metadata;
pub mod sort;
pub mod types;
pub mod view;
