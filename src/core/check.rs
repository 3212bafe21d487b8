//! core::check
//!
//! Read-only diagnosis of a batch.
//!
//! # Checks
//!
//! - The batch sorts (no cycle among in-batch declarations)
//! - Before/after references to units outside the batch, which the sorter
//!   silently ignores, are listed so an operator can spot typos
//!
//! # Invariants
//!
//! - Never fails on a cycle; the cycle is part of the report
//! - Fails only when metadata cannot be read

use serde::Serialize;

use super::metadata::{MetadataError, MetadataSource};
use super::sort::{PrioritySorter, SortError};
use super::types::UnitId;
use super::view::{ExternalReference, MetadataView};

/// Result of checking a batch.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// The activation order, or why there is none.
    #[serde(serialize_with = "serialize_outcome")]
    pub order: Result<Vec<UnitId>, SortError>,
    /// Inert references to units outside the batch.
    pub external: Vec<ExternalReference>,
}

impl CheckReport {
    /// Whether the batch can be ordered.
    pub fn ok(&self) -> bool {
        self.order.is_ok()
    }
}

/// Check a batch against `source`.
///
/// # Errors
///
/// Returns [`MetadataError`] if any unit's metadata cannot be read.
pub fn check(
    source: &dyn MetadataSource,
    units: impl IntoIterator<Item = UnitId>,
) -> Result<CheckReport, MetadataError> {
    let units: Vec<UnitId> = units.into_iter().collect();

    let mut view = MetadataView::new(source, units.iter().cloned());
    let external = view.external_references()?;

    let order = match PrioritySorter::new(source).sort(units) {
        Err(SortError::MetadataUnreadable { unit, reason }) => {
            return Err(MetadataError::Unreadable { unit, reason })
        }
        other => other,
    };

    Ok(CheckReport { order, external })
}

fn serialize_outcome<S: serde::Serializer>(
    order: &Result<Vec<UnitId>, SortError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(tag = "status", rename_all = "lowercase")]
    enum Outcome<'a> {
        Ok { units: &'a [UnitId] },
        Cycle { unit: &'a UnitId, predecessor: &'a UnitId },
        Error { message: String },
    }

    let outcome = match order {
        Ok(units) => Outcome::Ok { units },
        Err(SortError::CycleDetected { unit, predecessor }) => Outcome::Cycle { unit, predecessor },
        Err(other) => Outcome::Error {
            message: other.to_string(),
        },
    };
    outcome.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::IndexSource;
    use crate::core::types::UnitMetadata;
    use crate::core::view::Relation;

    fn id(s: &str) -> UnitId {
        UnitId::new(s).unwrap()
    }

    #[test]
    fn clean_batch() {
        let source = IndexSource::from_entries([(id("b"), UnitMetadata::default().after(id("a")))]);
        let report = check(&source, [id("a"), id("b")]).unwrap();

        assert!(report.ok());
        assert_eq!(report.order.unwrap(), vec![id("a"), id("b")]);
        assert!(report.external.is_empty());
    }

    #[test]
    fn reports_external_references() {
        let source =
            IndexSource::from_entries([(id("a"), UnitMetadata::default().after(id("typo")))]);
        let report = check(&source, [id("a")]).unwrap();

        assert!(report.ok());
        assert_eq!(report.external.len(), 1);
        assert_eq!(report.external[0].relation, Relation::After);
        assert_eq!(report.external[0].target, id("typo"));
    }

    #[test]
    fn cycle_is_reported_not_raised() {
        let source = IndexSource::from_entries([
            (id("x"), UnitMetadata::default().after(id("y"))),
            (id("y"), UnitMetadata::default().after(id("x"))),
        ]);
        let report = check(&source, [id("x"), id("y")]).unwrap();

        assert!(!report.ok());
        assert!(matches!(report.order, Err(SortError::CycleDetected { .. })));
    }

    #[test]
    fn json_shape() {
        let source = IndexSource::from_entries([
            (id("x"), UnitMetadata::default().after(id("y")).before(id("q"))),
            (id("y"), UnitMetadata::default().after(id("x"))),
        ]);
        let report = check(&source, [id("x"), id("y")]).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["order"]["status"], "cycle");
        assert_eq!(json["order"]["unit"], "y");
        assert_eq!(json["order"]["predecessor"], "x");
        assert_eq!(json["external"][0]["relation"], "before");
        assert_eq!(json["external"][0]["target"], "q");
    }

    #[test]
    fn unreadable_metadata_fails() {
        struct Broken;
        impl MetadataSource for Broken {
            fn read(&self, unit: &UnitId) -> Result<UnitMetadata, MetadataError> {
                Err(MetadataError::unreadable(unit, "gone"))
            }
        }

        assert!(check(&Broken, [id("a")]).is_err());
    }
}
