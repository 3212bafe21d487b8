//! core::sort
//!
//! Priority and partial-order sorting of configuration units.
//!
//! # Algorithm
//!
//! Three strictly ordered phases:
//!
//! 1. **Lexicographic seed**: units sorted by id. Every later tie falls back
//!    to this order.
//! 2. **Priority pass**: stable sort by ascending [`Order`].
//! 3. **Constraint pass**: iterative depth-first resolution of before/after
//!    constraints, taking roots in priority order. A predecessor that is
//!    still on the DFS stack closes a cycle and aborts the sort.
//!
//! # Invariants
//!
//! - Output is a permutation of the (deduplicated) input
//! - Every in-batch effective predecessor of a unit precedes it
//! - Identical input and metadata produce identical output, regardless of
//!   input iteration order
//!
//! [`Order`]: crate::core::types::Order

use std::collections::{btree_set, HashSet};

use thiserror::Error;
use tracing::{debug, trace};

use super::metadata::{MetadataError, MetadataSource};
use super::types::UnitId;
use super::view::MetadataView;

/// Errors from sorting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    /// Metadata for a unit could not be read.
    #[error("unable to read metadata for unit {unit}: {reason}")]
    MetadataUnreadable { unit: UnitId, reason: String },

    /// The before/after declarations form a cycle.
    ///
    /// `unit` was being visited when its predecessor `predecessor`, already
    /// on the visiting stack, closed the cycle.
    #[error("ordering cycle detected between {unit} and {predecessor}")]
    CycleDetected { unit: UnitId, predecessor: UnitId },

    /// Listing available metadata failed.
    #[error("metadata unavailable: {0}")]
    Unavailable(String),
}

impl From<MetadataError> for SortError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Unreadable { unit, reason } => {
                SortError::MetadataUnreadable { unit, reason }
            }
            other => SortError::Unavailable(other.to_string()),
        }
    }
}

/// Sorts units into activation order.
///
/// # Example
///
/// ```
/// use precedence::core::metadata::IndexSource;
/// use precedence::core::sort::PrioritySorter;
/// use precedence::core::types::{UnitId, UnitMetadata};
///
/// let a = UnitId::new("A").unwrap();
/// let b = UnitId::new("B").unwrap();
/// let c = UnitId::new("C").unwrap();
///
/// let source = IndexSource::from_entries([
///     (a.clone(), UnitMetadata::default().after(b.clone())),
///     (b.clone(), UnitMetadata::default().after(c.clone())),
/// ]);
///
/// let order = PrioritySorter::new(&source).sort([a.clone(), b.clone(), c.clone()]).unwrap();
/// assert_eq!(order, vec![c, b, a]);
/// ```
pub struct PrioritySorter<'s> {
    source: &'s dyn MetadataSource,
}

impl<'s> PrioritySorter<'s> {
    /// Create a sorter reading metadata from `source`.
    pub fn new(source: &'s dyn MetadataSource) -> Self {
        Self { source }
    }

    /// Sort `units` into activation order.
    ///
    /// Duplicate ids collapse into one.
    ///
    /// # Errors
    ///
    /// - [`SortError::MetadataUnreadable`] if any unit's metadata cannot be read
    /// - [`SortError::CycleDetected`] if the declarations form a cycle within
    ///   the batch
    ///
    /// No partial order is returned on error.
    pub fn sort(&self, units: impl IntoIterator<Item = UnitId>) -> Result<Vec<UnitId>, SortError> {
        let mut view = MetadataView::new(self.source, units);
        debug!(units = view.batch().len(), "sorting units");

        // The view's batch is a BTreeSet, so iterating it is the
        // lexicographic seed.
        let mut prioritized = Vec::with_capacity(view.batch().len());
        for unit in view.batch().clone() {
            let order = view.get(&unit)?.order;
            prioritized.push((order, unit));
        }
        prioritized.sort_by_key(|(order, _)| *order);

        let to_visit: Vec<UnitId> = prioritized.into_iter().map(|(_, unit)| unit).collect();
        let resolved = resolve(&mut view, &to_visit)?;

        debug!(units = resolved.len(), "sorted units");
        Ok(resolved)
    }
}

/// Working sets of the constraint pass.
#[derive(Default)]
struct Resolution {
    /// Result accumulator, in insertion order.
    resolved: Vec<UnitId>,
    /// Membership index over `resolved`.
    done: HashSet<UnitId>,
    /// Units on the DFS stack.
    visiting: HashSet<UnitId>,
}

/// A unit on the DFS stack and the predecessors it has yet to visit.
struct Frame {
    unit: UnitId,
    pending: btree_set::IntoIter<UnitId>,
}

/// Resolve before/after constraints over units in priority order.
fn resolve(view: &mut MetadataView<'_>, to_visit: &[UnitId]) -> Result<Vec<UnitId>, SortError> {
    let mut state = Resolution::default();

    for root in to_visit {
        if !state.done.contains(root) {
            visit(view, root, &mut state)?;
        }
    }

    Ok(state.resolved)
}

/// Depth-first visit of `root` with an explicit stack.
///
/// Predecessors are taken in lexicographic order; a unit resolves once all
/// of its in-batch predecessors have. Stack depth lives on the heap.
fn visit(
    view: &mut MetadataView<'_>,
    root: &UnitId,
    state: &mut Resolution,
) -> Result<(), SortError> {
    let mut stack = vec![enter(view, root, state)?];

    while let Some(frame) = stack.last_mut() {
        let Some(predecessor) = frame.pending.next() else {
            let unit = frame.unit.clone();
            stack.pop();
            state.visiting.remove(&unit);
            trace!(unit = %unit, position = state.resolved.len(), "resolved");
            state.done.insert(unit.clone());
            state.resolved.push(unit);
            continue;
        };

        if !view.contains(&predecessor) || state.done.contains(&predecessor) {
            continue;
        }
        if state.visiting.contains(&predecessor) {
            return Err(SortError::CycleDetected {
                unit: frame.unit.clone(),
                predecessor,
            });
        }

        let next = enter(view, &predecessor, state)?;
        stack.push(next);
    }

    Ok(())
}

fn enter(
    view: &mut MetadataView<'_>,
    unit: &UnitId,
    state: &mut Resolution,
) -> Result<Frame, SortError> {
    state.visiting.insert(unit.clone());
    Ok(Frame {
        unit: unit.clone(),
        pending: view.predecessors_of(unit)?.into_iter(),
    })
}
