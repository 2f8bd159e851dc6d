//! Medicine catalog and pharmacy models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A medicine known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Unique identifier
    pub id: String,
    /// Commercial name (e.g., "Doliprane")
    pub name: String,
    /// Generic/INN name (e.g., "Paracétamol")
    pub generic_name: Option<String>,
    /// Short description of what it treats
    pub description: Option<String>,
    /// Dosage per unit (e.g., "500mg")
    pub dosage: Option<String>,
    /// Galenic form (e.g., "Comprimé", "Gélule")
    pub form: Option<String>,
    /// Manufacturer name
    pub manufacturer: Option<String>,
    /// Whether dispensing requires a prescription
    pub requires_prescription: bool,
    /// Usage warnings shown to the user
    pub warnings: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Medicine {
    /// Create a new over-the-counter medicine with required fields.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            generic_name: None,
            description: None,
            dosage: None,
            form: None,
            manufacturer: None,
            requires_prescription: false,
            warnings: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A partner pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pharmacy {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Contact phone number
    pub phone: String,
    /// Latitude of the storefront
    pub latitude: f64,
    /// Longitude of the storefront
    pub longitude: f64,
    /// Opening hours keyed by day name (e.g., "lundi" → "8:00-20:00")
    pub opening_hours: BTreeMap<String, String>,
    /// Whether the pharmacy currently accepts orders
    pub is_active: bool,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Pharmacy {
    /// Create a new active pharmacy with required fields.
    pub fn new(name: String, address: String, phone: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            address,
            phone,
            latitude: 0.0,
            longitude: 0.0,
            opening_hours: BTreeMap::new(),
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Stock of one medicine at one pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacyInventory {
    /// Unique identifier
    pub id: String,
    /// Pharmacy holding the stock
    pub pharmacy_id: String,
    /// Medicine in stock
    pub medicine_id: String,
    /// Units available
    pub quantity: u32,
    /// Unit price (currency-agnostic, display-only precision)
    pub price: f64,
    /// Expiry date of the batch (YYYY-MM-DD)
    pub expiry_date: Option<String>,
    /// Last stock update timestamp (RFC 3339)
    pub updated_at: String,
}

impl PharmacyInventory {
    /// Create a new inventory row.
    pub fn new(pharmacy_id: String, medicine_id: String, quantity: u32, price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pharmacy_id,
            medicine_id,
            quantity,
            price,
            expiry_date: None,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether at least `requested` units are on hand.
    pub fn has_stock(&self, requested: u32) -> bool {
        self.quantity >= requested
    }
}

/// An inventory row joined with its pharmacy, as shown on the
/// availability list of the search screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    pub inventory: PharmacyInventory,
    pub pharmacy: Pharmacy,
}
