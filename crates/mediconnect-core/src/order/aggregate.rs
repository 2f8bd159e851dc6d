//! Per-pharmacy aggregation of purchase selections.

use std::collections::HashMap;

use crate::models::{OrderGroup, OrderLineItem, SelectionLine};

use super::{OrderError, OrderResult};

/// Group selections by chosen pharmacy and compute totals.
///
/// Lines without a chosen pharmacy are excluded. The result holds one
/// [`OrderGroup`] per distinct pharmacy id among the remaining lines;
/// within a group, line items keep the order in which their selections
/// first appeared in the input. Subtotals are `unit_price * quantity`
/// and each group's `total_amount` is the sum of its subtotals, both at
/// native f64 precision.
///
/// Group and line-item identifiers are fresh per call; two calls on the
/// same input agree on every amount but not on the ids.
///
/// Errors with [`OrderError::EmptySelection`] when no line survives the
/// exclusion. Never mutates its input.
pub fn aggregate_orders(selections: &[SelectionLine]) -> OrderResult<HashMap<String, OrderGroup>> {
    // First-encounter pharmacy order, so line items land in their
    // groups in input order.
    let mut pharmacy_order: Vec<String> = Vec::new();
    let mut lines_by_pharmacy: HashMap<String, Vec<OrderLineItem>> = HashMap::new();

    for selection in selections {
        let Some(pharmacy_id) = &selection.pharmacy_id else {
            continue;
        };

        let item = OrderLineItem {
            id: uuid::Uuid::new_v4().to_string(),
            medicine_id: selection.medicine_id.clone(),
            quantity: selection.quantity,
            unit_price: selection.unit_price,
            subtotal: selection.unit_price * selection.quantity as f64,
        };

        if !lines_by_pharmacy.contains_key(pharmacy_id) {
            pharmacy_order.push(pharmacy_id.clone());
        }
        lines_by_pharmacy
            .entry(pharmacy_id.clone())
            .or_default()
            .push(item);
    }

    if lines_by_pharmacy.is_empty() {
        return Err(OrderError::EmptySelection);
    }

    let mut groups = HashMap::with_capacity(pharmacy_order.len());
    for pharmacy_id in pharmacy_order {
        let items = lines_by_pharmacy
            .remove(&pharmacy_id)
            .unwrap_or_default();
        let total_amount = items.iter().map(|item| item.subtotal).sum();

        groups.insert(
            pharmacy_id.clone(),
            OrderGroup {
                id: uuid::Uuid::new_v4().to_string(),
                pharmacy_id,
                items,
                total_amount,
            },
        );
    }

    Ok(groups)
}
