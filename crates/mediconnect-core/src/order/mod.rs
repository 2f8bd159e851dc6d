//! Order composition and checkout.
//!
//! Pipeline: UI selections → [`aggregate_orders`] → one [`OrderGroup`]
//! per pharmacy → [`Checkout`] persists one order per group.
//!
//! [`OrderGroup`]: crate::models::OrderGroup

mod aggregate;
mod checkout;

pub use aggregate::*;
pub use checkout::*;

use thiserror::Error;

/// Order errors.
#[derive(Error, Debug)]
pub enum OrderError {
    /// No line had a chosen pharmacy. User error, not a system fault.
    #[error("No pharmacy selected for any item")]
    EmptySelection,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Missing delivery information: {0}")]
    MissingDeliveryInfo(&'static str),

    #[error("Insufficient stock for medicine {medicine_id}: {available} available")]
    InsufficientStock { medicine_id: String, available: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),
}

pub type OrderResult<T> = Result<T, OrderError>;
