//! core::metadata::cache
//!
//! Cross-call memoization of unit metadata.
//!
//! # Design
//!
//! A [`crate::core::view::MetadataView`] already memoizes reads within one
//! sort. `CachedSource` keeps them across sorts, for callers that sort many
//! batches against the same immutable source.
//!
//! - Entries are inserted once and never replaced
//! - Failed reads are not cached, so a later read retries the source
//! - Safe to share between threads when the inner source is

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::trace;

use super::{MetadataError, MetadataSource};
use crate::core::types::{UnitId, UnitMetadata};

/// Memoizing wrapper around another source.
#[derive(Debug, Default)]
pub struct CachedSource<S> {
    inner: S,
    entries: RwLock<HashMap<UnitId, UnitMetadata>>,
}

impl<S: MetadataSource> CachedSource<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unwrap the inner source, dropping the cache.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: MetadataSource> MetadataSource for CachedSource<S> {
    fn covers(&self, unit: &UnitId) -> bool {
        self.inner.covers(unit)
    }

    fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(unit)
        {
            return Ok(hit.clone());
        }

        let metadata = self.inner.read(unit)?;
        trace!(unit = %unit, "caching metadata");

        // A concurrent reader may have won the race; keep its entry.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(unit.clone()).or_insert(metadata).clone())
    }
}
