//! core::metadata::layered
//!
//! Index first, fallback for anything the index did not process.

use tracing::trace;

use super::{MetadataError, MetadataSource};
use crate::core::types::{UnitId, UnitMetadata};

/// Reads from `index` when it covers a unit and from `fallback` otherwise.
///
/// # Example
///
/// ```
/// use precedence::core::metadata::{IndexSource, LayeredSource, MetadataSource};
/// use precedence::core::types::{Order, UnitId, UnitMetadata};
///
/// let a = UnitId::new("a").unwrap();
/// let b = UnitId::new("b").unwrap();
/// let index = IndexSource::from_entries([(a.clone(), UnitMetadata::with_order(1))]);
/// let fallback = IndexSource::from_entries([
///     (a.clone(), UnitMetadata::with_order(99)),
///     (b.clone(), UnitMetadata::with_order(2)),
/// ]);
///
/// let layered = LayeredSource::new(index, fallback);
/// assert_eq!(layered.read(&a).unwrap().order, Order::new(1));
/// assert_eq!(layered.read(&b).unwrap().order, Order::new(2));
/// ```
#[derive(Debug, Clone)]
pub struct LayeredSource<I, F> {
    index: I,
    fallback: F,
}

impl<I: MetadataSource, F: MetadataSource> LayeredSource<I, F> {
    /// Layer `index` over `fallback`.
    pub fn new(index: I, fallback: F) -> Self {
        Self { index, fallback }
    }
}

impl<I: MetadataSource, F: MetadataSource> MetadataSource for LayeredSource<I, F> {
    fn covers(&self, unit: &UnitId) -> bool {
        self.index.covers(unit) || self.fallback.covers(unit)
    }

    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        if self.index.covers(unit) {
            self.index.read(unit)
        } else {
            trace!(unit = %unit, "not indexed, falling back");
            self.fallback.read(unit)
        }
    }
}
