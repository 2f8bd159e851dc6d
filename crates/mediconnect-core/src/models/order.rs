//! Order models: pre-submission selections and persisted orders.

use serde::{Deserialize, Serialize};

/// One user-chosen purchase, collected by the UI before submission.
///
/// Invariants (caller's responsibility): `quantity >= 1`,
/// `unit_price >= 0`. A line without a chosen pharmacy is treated as
/// "not ordered" and excluded from aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionLine {
    /// Medicine being purchased
    pub medicine_id: String,
    /// Pharmacy chosen for this line, if any
    pub pharmacy_id: Option<String>,
    /// Units requested
    pub quantity: u32,
    /// Unit price quoted from the pharmacy's inventory
    pub unit_price: f64,
}

impl SelectionLine {
    /// Create a selection with a chosen pharmacy.
    pub fn new(medicine_id: String, pharmacy_id: String, quantity: u32, unit_price: f64) -> Self {
        Self {
            medicine_id,
            pharmacy_id: Some(pharmacy_id),
            quantity,
            unit_price,
        }
    }

    /// Create a selection the user has not assigned to a pharmacy yet.
    pub fn unassigned(medicine_id: String, quantity: u32, unit_price: f64) -> Self {
        Self {
            medicine_id,
            pharmacy_id: None,
            quantity,
            unit_price,
        }
    }
}

/// One priced line of an aggregated order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Unique within the aggregation call that produced it
    pub id: String,
    /// Medicine being purchased
    pub medicine_id: String,
    /// Units requested
    pub quantity: u32,
    /// Unit price at aggregation time
    pub unit_price: f64,
    /// `unit_price * quantity`, native f64 precision
    pub subtotal: f64,
}

/// All lines for one pharmacy, with the computed order total.
///
/// `total_amount` is the sum of the members' subtotals, computed
/// without intermediate rounding. This mirrors a display-only
/// convenience computation; a real monetary ledger would need
/// fixed-point arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderGroup {
    /// Unique within the aggregation call that produced it
    pub id: String,
    /// Pharmacy this order goes to
    pub pharmacy_id: String,
    /// Line items, in the order first encountered in the input
    pub items: Vec<OrderLineItem>,
    /// Sum of the items' subtotals
    pub total_amount: f64,
}

/// Delivery status of a persisted order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum OrderStatus {
    /// Submitted, awaiting pharmacy confirmation
    Pending,
    /// Pharmacy accepted the order
    Confirmed,
    /// Being prepared
    Preparing,
    /// Out for delivery
    Delivering,
    /// Delivered to the customer
    Delivered,
    /// Cancelled by either party
    Cancelled,
}

/// Payment status of a persisted order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// A persisted order, one per pharmacy per submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique identifier
    pub id: String,
    /// Customer who placed the order
    pub user_id: String,
    /// Pharmacy fulfilling the order
    pub pharmacy_id: String,
    /// Source prescription, when ordered from a scan
    pub prescription_id: Option<String>,
    /// Total amount across the order's items
    pub total_amount: f64,
    /// Delivery street address
    pub delivery_address: String,
    /// Delivery contact phone
    pub delivery_phone: String,
    /// Delivery status
    pub status: OrderStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Payment method chosen at checkout (e.g., "cash", "mobile_money")
    pub payment_method: Option<String>,
    /// Free-text delivery notes
    pub notes: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl Order {
    /// Create a new pending order.
    pub fn new(
        user_id: String,
        pharmacy_id: String,
        total_amount: f64,
        delivery_address: String,
        delivery_phone: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            pharmacy_id,
            prescription_id: None,
            total_amount,
            delivery_address,
            delivery_phone,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A persisted order line, belonging to one [`Order`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique identifier
    pub id: String,
    /// Owning order
    pub order_id: String,
    /// Medicine purchased
    pub medicine_id: String,
    /// Units purchased
    pub quantity: u32,
    /// Unit price at purchase time
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub subtotal: f64,
}

impl OrderItem {
    /// Persisted form of an aggregated line item.
    pub fn from_line_item(order_id: &str, line: &OrderLineItem) -> Self {
        Self {
            id: line.id.clone(),
            order_id: order_id.to_string(),
            medicine_id: line.medicine_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new_is_pending() {
        let order = Order::new(
            "user1".into(),
            "p1".into(),
            2200.0,
            "Rue 10, Dakar".into(),
            "+221 77 123 45 67".into(),
        );
        assert!(matches!(order.status, OrderStatus::Pending));
        assert!(matches!(order.payment_status, PaymentStatus::Pending));
        assert_eq!(order.id.len(), 36);
    }

    #[test]
    fn test_order_item_from_line_item() {
        let line = OrderLineItem {
            id: "li1".into(),
            medicine_id: "m1".into(),
            quantity: 2,
            unit_price: 500.0,
            subtotal: 1000.0,
        };
        let item = OrderItem::from_line_item("o1", &line);
        assert_eq!(item.order_id, "o1");
        assert_eq!(item.subtotal, 1000.0);
    }
}
