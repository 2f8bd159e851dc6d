//! Order database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Order, OrderItem, OrderStatus, PaymentStatus};

impl Database {
    /// Insert an order together with its items, atomically.
    pub fn insert_order(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO orders (
                id, user_id, pharmacy_id, prescription_id, total_amount,
                delivery_address, delivery_phone, status, payment_status,
                payment_method, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                order.id,
                order.user_id,
                order.pharmacy_id,
                order.prescription_id,
                order.total_amount,
                order.delivery_address,
                order.delivery_phone,
                order_status_to_string(&order.status),
                payment_status_to_string(&order.payment_status),
                order.payment_method,
                order.notes,
                order.created_at,
                order.updated_at,
            ],
        )?;

        for item in items {
            tx.execute(
                r#"
                INSERT INTO order_items (
                    id, order_id, medicine_id, quantity, unit_price, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    item.id,
                    item.order_id,
                    item.medicine_id,
                    item.quantity,
                    item.unit_price,
                    item.subtotal,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Get an order by id.
    pub fn get_order(&self, id: &str) -> DbResult<Option<Order>> {
        self.conn
            .query_row(
                r#"
                SELECT id, user_id, pharmacy_id, prescription_id, total_amount,
                       delivery_address, delivery_phone, status, payment_status,
                       payment_method, notes, created_at, updated_at
                FROM orders
                WHERE id = ?
                "#,
                [id],
                order_row_from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a user's orders, most recent first.
    pub fn list_orders_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, pharmacy_id, prescription_id, total_amount,
                   delivery_address, delivery_phone, status, payment_status,
                   payment_method, notes, created_at, updated_at
            FROM orders
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([user_id], order_row_from_row)?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?.try_into()?);
        }
        Ok(orders)
    }

    /// List the items of an order, in insertion order.
    pub fn list_order_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, order_id, medicine_id, quantity, unit_price, subtotal
            FROM order_items
            WHERE order_id = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([order_id], |row| {
            Ok(OrderItem {
                id: row.get(0)?,
                order_id: row.get(1)?,
                medicine_id: row.get(2)?,
                quantity: row.get(3)?,
                unit_price: row.get(4)?,
                subtotal: row.get(5)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Update an order's delivery status.
    pub fn update_order_status(&self, id: &str, status: OrderStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE orders SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![id, order_status_to_string(&status)],
        )?;
        Ok(rows_affected > 0)
    }

    /// Update an order's payment status.
    pub fn update_payment_status(&self, id: &str, status: PaymentStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE orders SET payment_status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![id, payment_status_to_string(&status)],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct OrderRow {
    id: String,
    user_id: String,
    pharmacy_id: String,
    prescription_id: Option<String>,
    total_amount: f64,
    delivery_address: String,
    delivery_phone: String,
    status: String,
    payment_status: String,
    payment_method: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn order_row_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRow> {
    Ok(OrderRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pharmacy_id: row.get(2)?,
        prescription_id: row.get(3)?,
        total_amount: row.get(4)?,
        delivery_address: row.get(5)?,
        delivery_phone: row.get(6)?,
        status: row.get(7)?,
        payment_status: row.get(8)?,
        payment_method: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            pharmacy_id: row.pharmacy_id,
            prescription_id: row.prescription_id,
            total_amount: row.total_amount,
            delivery_address: row.delivery_address,
            delivery_phone: row.delivery_phone,
            status: string_to_order_status(&row.status)?,
            payment_status: string_to_payment_status(&row.payment_status)?,
            payment_method: row.payment_method,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn order_status_to_string(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Preparing => "preparing",
        OrderStatus::Delivering => "delivering",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn string_to_order_status(s: &str) -> Result<OrderStatus, DbError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "preparing" => Ok(OrderStatus::Preparing),
        "delivering" => Ok(OrderStatus::Delivering),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(DbError::Constraint(format!("Unknown order status: {}", s))),
    }
}

fn payment_status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Paid => "paid",
        PaymentStatus::Failed => "failed",
    }
}

fn string_to_payment_status(s: &str) -> Result<PaymentStatus, DbError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(DbError::Constraint(format!(
            "Unknown payment status: {}",
            s
        ))),
    }
}
