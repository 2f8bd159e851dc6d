//! Property tests for selection aggregation.

use std::collections::HashSet;

use mediconnect_core::{aggregate_orders, OrderError, SelectionLine};
use proptest::prelude::*;

fn arb_selection() -> impl Strategy<Value = SelectionLine> {
    (
        "[a-z]{3,10}",
        prop::option::of(prop::sample::select(vec![
            "ph-centrale".to_string(),
            "ph-almadies".to_string(),
            "ph-point-e".to_string(),
        ])),
        1u32..50,
        // Integer franc amounts stay exact in f64
        1u32..10_000,
    )
        .prop_map(|(medicine_id, pharmacy_id, quantity, price)| SelectionLine {
            medicine_id,
            pharmacy_id,
            quantity,
            unit_price: f64::from(price),
        })
}

proptest! {
    #[test]
    fn test_group_total_is_sum_of_subtotals(selections in prop::collection::vec(arb_selection(), 1..20)) {
        if let Ok(groups) = aggregate_orders(&selections) {
            for group in groups.values() {
                let sum: f64 = group.items.iter().map(|i| i.subtotal).sum();
                prop_assert_eq!(group.total_amount, sum);
                for item in &group.items {
                    prop_assert_eq!(item.subtotal, item.unit_price * f64::from(item.quantity));
                }
            }
        }
    }

    #[test]
    fn test_grand_total_matches_assigned_lines(selections in prop::collection::vec(arb_selection(), 1..20)) {
        let expected: f64 = selections
            .iter()
            .filter(|s| s.pharmacy_id.is_some())
            .map(|s| s.unit_price * f64::from(s.quantity))
            .sum();

        match aggregate_orders(&selections) {
            Ok(groups) => {
                let grand: f64 = groups.values().map(|g| g.total_amount).sum();
                prop_assert_eq!(grand, expected);
            }
            Err(OrderError::EmptySelection) => {
                prop_assert!(selections.iter().all(|s| s.pharmacy_id.is_none()));
            }
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {}", e))),
        }
    }

    #[test]
    fn test_one_group_per_distinct_pharmacy(selections in prop::collection::vec(arb_selection(), 1..20)) {
        let distinct: HashSet<&String> = selections
            .iter()
            .filter_map(|s| s.pharmacy_id.as_ref())
            .collect();

        match aggregate_orders(&selections) {
            Ok(groups) => {
                prop_assert_eq!(groups.len(), distinct.len());
                let line_count: usize = groups.values().map(|g| g.items.len()).sum();
                let assigned = selections.iter().filter(|s| s.pharmacy_id.is_some()).count();
                prop_assert_eq!(line_count, assigned);
            }
            Err(OrderError::EmptySelection) => prop_assert!(distinct.is_empty()),
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {}", e))),
        }
    }

    #[test]
    fn test_aggregation_totals_are_stable(selections in prop::collection::vec(arb_selection(), 1..20)) {
        let first = aggregate_orders(&selections);
        let second = aggregate_orders(&selections);

        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.len(), b.len());
                for (pharmacy_id, group) in &a {
                    let other = &b[pharmacy_id];
                    prop_assert_eq!(group.total_amount, other.total_amount);
                    prop_assert_eq!(group.items.len(), other.items.len());
                }
            }
            (Err(OrderError::EmptySelection), Err(OrderError::EmptySelection)) => {}
            _ => return Err(TestCaseError::fail("aggregation not deterministic")),
        }
    }
}
