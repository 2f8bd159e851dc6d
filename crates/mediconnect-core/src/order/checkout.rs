//! Checkout: turn selections into persisted orders.

use crate::db::Database;
use crate::models::{Order, OrderItem, PrescriptionStatus, SelectionLine};

use super::{aggregate_orders, OrderError, OrderResult};

/// Delivery details collected at checkout.
#[derive(Debug, Clone)]
pub struct DeliveryInfo {
    pub address: String,
    pub phone: String,
    pub notes: Option<String>,
}

impl DeliveryInfo {
    fn validate(&self) -> OrderResult<()> {
        if self.address.trim().is_empty() {
            return Err(OrderError::MissingDeliveryInfo("address"));
        }
        if self.phone.trim().is_empty() {
            return Err(OrderError::MissingDeliveryInfo("phone"));
        }
        Ok(())
    }
}

/// Checkout flow over an injected database.
pub struct Checkout<'a> {
    db: &'a Database,
}

impl<'a> Checkout<'a> {
    /// Create a new checkout over the given database.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Place a direct order for one medicine at one pharmacy.
    ///
    /// The unit price is read from the pharmacy's inventory; the order
    /// is rejected when the medicine is not stocked there or the stock
    /// is below the requested quantity.
    pub fn place_direct_order(
        &self,
        user_id: &str,
        pharmacy_id: &str,
        medicine_id: &str,
        quantity: u32,
        delivery: &DeliveryInfo,
    ) -> OrderResult<Order> {
        delivery.validate()?;
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let inventory = self
            .db
            .get_inventory(pharmacy_id, medicine_id)?
            .ok_or_else(|| {
                OrderError::NotFound(format!(
                    "inventory for medicine {} at pharmacy {}",
                    medicine_id, pharmacy_id
                ))
            })?;

        if !inventory.has_stock(quantity) {
            return Err(OrderError::InsufficientStock {
                medicine_id: medicine_id.to_string(),
                available: inventory.quantity,
            });
        }

        let selection = SelectionLine::new(
            medicine_id.to_string(),
            pharmacy_id.to_string(),
            quantity,
            inventory.price,
        );
        let groups = aggregate_orders(std::slice::from_ref(&selection))?;
        let group = &groups[pharmacy_id];

        let mut order = Order::new(
            user_id.to_string(),
            pharmacy_id.to_string(),
            group.total_amount,
            delivery.address.clone(),
            delivery.phone.clone(),
        );
        order.notes = delivery.notes.clone();

        let items: Vec<OrderItem> = group
            .items
            .iter()
            .map(|item| OrderItem::from_line_item(&order.id, item))
            .collect();

        self.db.insert_order(&order, &items)?;
        Ok(order)
    }

    /// Place one order per pharmacy for a set of prescription
    /// selections, then mark the prescription processed.
    ///
    /// Orders are persisted in the order their pharmacies first appear
    /// among the selections. Fails with [`OrderError::EmptySelection`]
    /// when no selection has a chosen pharmacy.
    pub fn place_prescription_orders(
        &self,
        user_id: &str,
        prescription_id: &str,
        selections: &[SelectionLine],
        delivery: &DeliveryInfo,
    ) -> OrderResult<Vec<Order>> {
        delivery.validate()?;

        let mut groups = aggregate_orders(selections)?;

        let mut orders = Vec::with_capacity(groups.len());
        for pharmacy_id in first_encounter_pharmacies(selections) {
            let Some(group) = groups.remove(&pharmacy_id) else {
                continue;
            };

            let mut order = Order::new(
                user_id.to_string(),
                pharmacy_id,
                group.total_amount,
                delivery.address.clone(),
                delivery.phone.clone(),
            );
            order.prescription_id = Some(prescription_id.to_string());
            order.notes = delivery
                .notes
                .clone()
                .or_else(|| Some("Commande depuis ordonnance".to_string()));

            let items: Vec<OrderItem> = group
                .items
                .iter()
                .map(|item| OrderItem::from_line_item(&order.id, item))
                .collect();

            self.db.insert_order(&order, &items)?;
            orders.push(order);
        }

        self.db
            .update_prescription_status(prescription_id, PrescriptionStatus::Processed)?;

        Ok(orders)
    }
}

/// Distinct pharmacy ids in the order they first appear.
fn first_encounter_pharmacies(selections: &[SelectionLine]) -> Vec<String> {
    let mut seen = Vec::new();
    for selection in selections {
        if let Some(pharmacy_id) = &selection.pharmacy_id {
            if !seen.contains(pharmacy_id) {
                seen.push(pharmacy_id.clone());
            }
        }
    }
    seen
}
