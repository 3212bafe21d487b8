//! core::metadata
//!
//! Sources of per-unit ordering metadata.
//!
//! # Modules
//!
//! - [`schema`] - On-disk formats for indexes and declarations
//! - [`index`] - Precomputed index (fast path)
//! - [`declaration`] - Per-unit declaration files read on demand (slow path)
//! - [`layered`] - Index first, declarations for anything it does not cover
//! - [`cache`] - Cross-call memoization safe for concurrent readers
//!
//! # Architecture
//!
//! The sorter never reads files itself. It asks a [`MetadataSource`] for
//! the order and before/after relations of each unit, so a precomputed
//! index and on-demand declaration parsing are interchangeable.
//!
//! # Example
//!
//! ```
//! use precedence::core::metadata::{IndexSource, MetadataSource};
//! use precedence::core::types::{Order, UnitId, UnitMetadata};
//!
//! let web = UnitId::new("web").unwrap();
//! let source = IndexSource::from_entries([(web.clone(), UnitMetadata::with_order(5))]);
//!
//! assert!(source.covers(&web));
//! assert_eq!(source.read(&web).unwrap().order, Order::new(5));
//! ```

pub mod cache;
pub mod declaration;
pub mod index;
pub mod layered;
pub mod schema;

pub use cache::CachedSource;
pub use declaration::DeclarationSource;
pub use index::{IndexError, IndexSource};
pub use layered::LayeredSource;
pub use schema::{DeclaredMetadata, INDEX_KIND, SCHEMA_VERSION};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{UnitId, UnitMetadata};

/// Errors from reading unit metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// The source could not produce metadata for a unit.
    #[error("unable to read metadata for unit {unit}: {reason}")]
    Unreadable { unit: UnitId, reason: String },

    /// A declaration directory could not be listed.
    #[error("failed to scan '{path}': {reason}")]
    Scan { path: PathBuf, reason: String },
}

impl MetadataError {
    /// Shorthand for [`MetadataError::Unreadable`].
    pub fn unreadable(unit: &UnitId, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            unit: unit.clone(),
            reason: reason.into(),
        }
    }
}

/// A provider of ordering metadata for units.
///
/// Implementations must return the same metadata for repeated reads of
/// the same unit.
pub trait MetadataSource {
    /// Whether this source has first-hand knowledge of `unit`.
    ///
    /// Used by [`LayeredSource`] to decide whether to fall back.
    fn covers(&self, _unit: &UnitId) -> bool {
        true
    }

    /// Read the metadata of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Unreadable`] if the metadata cannot be
    /// produced.
    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn covers(&self, unit: &UnitId) -> bool {
        (**self).covers(unit)
    }

    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        (**self).read(unit)
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for Box<T> {
    fn covers(&self, unit: &UnitId) -> bool {
        (**self).covers(unit)
    }

    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        (**self).read(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl MetadataSource for Failing {
        fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
            Err(MetadataError::unreadable(unit, "boom"))
        }
    }

    #[test]
    fn unreadable_names_the_unit() {
        let unit = UnitId::new("com.example.Broken").unwrap();
        let err = Failing.read(&unit).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to read metadata for unit com.example.Broken: boom"
        );
    }

    #[test]
    fn boxed_and_borrowed_sources_forward() {
        let unit = UnitId::new("a").unwrap();
        let boxed: Box<dyn MetadataSource> = Box::new(Failing);
        assert!(boxed.covers(&unit));
        assert!(boxed.read(&unit).is_err());

        let borrowed = &Failing;
        assert!(borrowed.read(&unit).is_err());
    }
}
