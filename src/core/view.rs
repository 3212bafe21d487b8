//! core::view
//!
//! Per-sort view of unit metadata.
//!
//! # Architecture
//!
//! A `MetadataView` is built for a single batch of units. It reads each
//! unit's metadata from the underlying [`MetadataSource`] on first access
//! and memoizes it for the rest of the sort.
//!
//! # Invariants
//!
//! - Each unit is read from the source at most once per view
//! - The effective predecessors of `X` are `X.after` plus every unit in the
//!   batch whose `before` names `X`
//! - References to units outside the batch are kept as declared; callers
//!   decide whether to ignore them

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::trace;

use super::metadata::{MetadataError, MetadataSource};
use super::types::{UnitId, UnitMetadata};

/// Which side of a relation a reference was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Declared in the unit's `before` set.
    Before,
    /// Declared in the unit's `after` set.
    After,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Before => write!(f, "before"),
            Relation::After => write!(f, "after"),
        }
    }
}

/// A before/after reference to a unit that is not part of the batch.
///
/// These are inert: they never influence the ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ExternalReference {
    /// The unit declaring the relation.
    pub unit: UnitId,
    /// Which set the reference appears in.
    pub relation: Relation,
    /// The referenced unit, absent from the batch.
    pub target: UnitId,
}

/// Lazily populated metadata cache for one batch of units.
pub struct MetadataView<'s> {
    source: &'s dyn MetadataSource,
    batch: BTreeSet<UnitId>,
    cache: HashMap<UnitId, UnitMetadata>,
    /// Batch members declaring `before = [key]`, built on first use.
    declared_before: Option<HashMap<UnitId, BTreeSet<UnitId>>>,
}

impl<'s> MetadataView<'s> {
    /// Create a view over `batch`, reading from `source`.
    ///
    /// Nothing is read until the first lookup.
    pub fn new(source: &'s dyn MetadataSource, batch: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            source,
            batch: batch.into_iter().collect(),
            cache: HashMap::new(),
            declared_before: None,
        }
    }

    /// The units of this batch in lexicographic order.
    pub fn batch(&self) -> &BTreeSet<UnitId> {
        &self.batch
    }

    /// Whether `unit` is part of the batch.
    pub fn contains(&self, unit: &UnitId) -> bool {
        self.batch.contains(unit)
    }

    /// Metadata of `unit`, read from the source on first access.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Unreadable`] if the source cannot produce
    /// the metadata. Failures are not memoized.
    pub fn get(&mut self, unit: &UnitId) -> Result<&UnitMetadata, MetadataError> {
        debug_assert!(self.batch.contains(unit), "{unit} is not in the batch");
        load(&mut self.cache, self.source, unit)
    }

    /// Units that must be ordered before `unit`.
    ///
    /// The union of `unit`'s own `after` set and every batch member whose
    /// `before` set names `unit`. May include units outside the batch.
    ///
    /// The first call reads the whole batch and indexes its `before`
    /// declarations; later calls cost O(degree).
    pub fn predecessors_of(&mut self, unit: &UnitId) -> Result<BTreeSet<UnitId>, MetadataError> {
        self.index_before()?;

        let mut predecessors = self.get(unit)?.after.clone();
        if let Some(declared) = self.declared_before.as_ref().and_then(|m| m.get(unit)) {
            predecessors.extend(declared.iter().cloned());
        }

        Ok(predecessors)
    }

    /// Build the reverse map of in-batch `before` declarations.
    fn index_before(&mut self) -> Result<(), MetadataError> {
        if self.declared_before.is_some() {
            return Ok(());
        }

        let mut declared: HashMap<UnitId, BTreeSet<UnitId>> = HashMap::new();
        for unit in &self.batch {
            let meta = load(&mut self.cache, self.source, unit)?;
            for target in meta.before.iter().filter(|t| self.batch.contains(*t)) {
                declared
                    .entry(target.clone())
                    .or_default()
                    .insert(unit.clone());
            }
        }

        trace!(targets = declared.len(), "indexed before declarations");
        self.declared_before = Some(declared);
        Ok(())
    }

    /// Every before/after reference naming a unit outside the batch.
    ///
    /// Sorted by declaring unit, then relation, then target.
    pub fn external_references(&mut self) -> Result<Vec<ExternalReference>, MetadataError> {
        let mut external = Vec::new();

        for unit in &self.batch {
            let meta = load(&mut self.cache, self.source, unit)?;
            let relations = [
                (Relation::Before, &meta.before),
                (Relation::After, &meta.after),
            ];
            for (relation, targets) in relations {
                external.extend(
                    targets
                        .iter()
                        .filter(|target| !self.batch.contains(*target))
                        .map(|target| ExternalReference {
                            unit: unit.clone(),
                            relation,
                            target: target.clone(),
                        }),
                );
            }
        }

        Ok(external)
    }
}

/// Memoized read through `cache`.
///
/// A free function so callers can iterate the batch while filling the cache.
fn load<'c>(
    cache: &'c mut HashMap<UnitId, UnitMetadata>,
    source: &dyn MetadataSource,
    unit: &UnitId,
) -> Result<&'c UnitMetadata, MetadataError> {
    if !cache.contains_key(unit) {
        trace!(unit = %unit, "reading metadata");
        let metadata = source.read(unit)?;
        cache.insert(unit.clone(), metadata);
    }

    cache
        .get(unit)
        .ok_or_else(|| MetadataError::unreadable(unit, "metadata cache lost entry"))
}
