//! Property-based tests for the sorter.
//!
//! These tests use proptest to verify ordering invariants hold across
//! randomly generated batches.

use std::collections::HashMap;

use proptest::prelude::*;

use precedence::core::metadata::IndexSource;
use precedence::core::sort::{PrioritySorter, SortError};
use precedence::core::types::{Order, UnitId, UnitMetadata};

/// A batch whose relations only ever point from a lower index to a higher
/// one, so it can never contain a cycle.
#[derive(Debug, Clone)]
struct AcyclicBatch {
    units: Vec<UnitId>,
    source: IndexSource,
    /// `(earlier, later)` pairs every valid order must honor.
    constraints: Vec<(UnitId, UnitId)>,
}

fn unit(i: usize) -> UnitId {
    UnitId::new(format!("unit{i:02}")).unwrap()
}

fn build(orders: Vec<Option<i32>>, edges: Vec<(usize, usize, bool)>) -> AcyclicBatch {
    let units: Vec<UnitId> = (0..orders.len()).map(unit).collect();
    let mut metas: Vec<UnitMetadata> = orders
        .into_iter()
        .map(|order| order.map(UnitMetadata::with_order).unwrap_or_default())
        .collect();

    let mut constraints = Vec::new();
    for (a, b, via_after) in edges {
        if a == b {
            continue;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        if via_after {
            metas[hi].after.insert(unit(lo));
        } else {
            metas[lo].before.insert(unit(hi));
        }
        constraints.push((unit(lo), unit(hi)));
    }

    AcyclicBatch {
        source: IndexSource::from_entries(units.iter().cloned().zip(metas)),
        units,
        constraints,
    }
}

/// Strategy for batches of up to twelve units with random relations.
fn acyclic_batch() -> impl Strategy<Value = AcyclicBatch> {
    (1usize..12)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::option::of(-3i32..3), n),
                prop::collection::vec((0..n, 0..n, any::<bool>()), 0..n * 2),
            )
        })
        .prop_map(|(orders, edges)| build(orders, edges))
}

fn positions(order: &[UnitId]) -> HashMap<&UnitId, usize> {
    order.iter().enumerate().map(|(i, u)| (u, i)).collect()
}

proptest! {
    /// Every unit appears exactly once in the result.
    #[test]
    fn result_is_a_permutation(batch in acyclic_batch()) {
        let order = PrioritySorter::new(&batch.source).sort(batch.units.clone()).unwrap();

        let mut sorted = order.clone();
        sorted.sort();
        prop_assert_eq!(sorted, batch.units);
    }

    /// Every before/after relation is honored.
    #[test]
    fn constraints_satisfied(batch in acyclic_batch()) {
        let order = PrioritySorter::new(&batch.source).sort(batch.units.clone()).unwrap();
        let pos = positions(&order);

        for (earlier, later) in &batch.constraints {
            prop_assert!(
                pos[earlier] < pos[later],
                "{} should precede {} in {:?}", earlier, later, order
            );
        }
    }

    /// Input order and duplicates never change the result.
    #[test]
    fn input_order_irrelevant(
        (batch, shuffled) in acyclic_batch().prop_flat_map(|b| {
            let units = b.units.clone();
            (Just(b), Just(units).prop_shuffle())
        })
    ) {
        let sorter = PrioritySorter::new(&batch.source);
        let expected = sorter.sort(batch.units.clone()).unwrap();

        prop_assert_eq!(&sorter.sort(shuffled.clone()).unwrap(), &expected);

        let doubled: Vec<UnitId> = shuffled.iter().chain(batch.units.iter()).cloned().collect();
        prop_assert_eq!(&sorter.sort(doubled).unwrap(), &expected);
    }

    /// Without relations, the result is ordered by priority, then by id.
    #[test]
    fn priority_then_lexicographic(orders in prop::collection::vec(prop::option::of(-5i32..5), 1..12)) {
        let batch = build(orders.clone(), vec![]);
        let order = PrioritySorter::new(&batch.source).sort(batch.units.clone()).unwrap();

        let declared: HashMap<UnitId, Order> = batch
            .units
            .iter()
            .cloned()
            .zip(orders.iter().map(|o| o.map(Order::new).unwrap_or_default()))
            .collect();
        let keys: Vec<(Order, &UnitId)> = order.iter().map(|u| (declared[u], u)).collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(keys, expected);
    }

    /// A chain closed back onto its head is always reported as a cycle.
    #[test]
    fn closed_chain_is_a_cycle(n in 1usize..10) {
        let units: Vec<UnitId> = (0..n).map(unit).collect();
        let mut metas = vec![UnitMetadata::default(); n];
        for i in 1..n {
            metas[i].after.insert(unit(i - 1));
        }
        metas[0].after.insert(unit(n - 1));

        let source = IndexSource::from_entries(units.iter().cloned().zip(metas));
        let result = PrioritySorter::new(&source).sort(units);
        prop_assert!(
            matches!(result, Err(SortError::CycleDetected { .. })),
            "expected a cycle, got {:?}", result
        );
    }
}
