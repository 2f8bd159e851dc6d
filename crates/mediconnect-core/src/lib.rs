//! MediConnect Core Library
//!
//! Local-first pharmacy ordering core for the MediConnect mobile app.
//!
//! # Architecture
//!
//! ```text
//! Search / Scan / Chat (mobile UI)
//!               │
//!               ▼
//!       ┌───────────────┐
//!       │  MediConnect  │  UniFFI object
//!       └───────┬───────┘
//!               │
//!    ┌──────────┼─────────────────┐
//!    ▼          ▼                 ▼
//! Catalog   Prescription      Assistant
//! (SQLite    matching         (reply rules)
//!  + FTS5)      │
//!               ▼
//!       Selection per medicine
//!               │
//!               ▼
//!       aggregate_orders (one group per pharmacy)
//!               │
//!               ▼
//!       Checkout (one persisted Order per group)
//! ```
//!
//! # Core Principle
//!
//! **The assistant never diagnoses.** Replies are canned guidance; anything
//! it cannot answer falls back to pointing the user at a professional.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer with FTS5 search
//! - [`models`]: Domain types (Medicine, Pharmacy, Order, Prescription, etc.)
//! - [`order`]: Selection aggregation and checkout
//! - [`prescription`]: Scan intake and catalog matching
//! - [`latency`]: Simulated network delay for demo builds

pub mod db;
pub mod latency;
pub mod models;
pub mod order;
pub mod prescription;

// Re-export commonly used types
pub use db::Database;
pub use latency::{DelayPolicy, FixedDelay, NoDelay};
pub use models::{
    Availability, ChatConversation, ChatMessage, Medicine, MessageRole, Order, OrderGroup,
    OrderItem, OrderLineItem, OrderStatus, PaymentStatus, Pharmacy, PharmacyInventory,
    Prescription, PrescriptionStatus, SelectionLine,
};
pub use order::{aggregate_orders, Checkout, DeliveryInfo, OrderError};
pub use prescription::{extract_medicine_names, PrescriptionMatch, PrescriptionService};

pub use mediconnect_assistant::{ReplySelector, FALLBACK_RESPONSE};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MediConnectError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("No pharmacy selected for any medicine")]
    EmptySelection,

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
}

impl From<db::DbError> for MediConnectError {
    fn from(e: db::DbError) -> Self {
        MediConnectError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for MediConnectError {
    fn from(e: serde_json::Error) -> Self {
        MediConnectError::SerializationError(e.to_string())
    }
}

impl From<OrderError> for MediConnectError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::EmptySelection => MediConnectError::EmptySelection,
            OrderError::InvalidQuantity(_) | OrderError::MissingDeliveryInfo(_) => {
                MediConnectError::InvalidInput(e.to_string())
            }
            OrderError::InsufficientStock { .. } => {
                MediConnectError::InsufficientStock(e.to_string())
            }
            OrderError::NotFound(what) => MediConnectError::NotFound(what),
            OrderError::Database(db_err) => MediConnectError::DatabaseError(db_err.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for MediConnectError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MediConnectError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MediConnect>, MediConnectError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(MediConnect::with_delay(db, Box::new(NoDelay))))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MediConnect>, MediConnectError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MediConnect::with_delay(db, Box::new(NoDelay))))
}

/// Create an in-memory database seeded with the demo catalog.
///
/// Calls pause briefly so the UI's loading states stay visible, the
/// way a remote backend would behave.
#[uniffi::export]
pub fn open_demo_database() -> Result<Arc<MediConnect>, MediConnectError> {
    let db = Database::open_in_memory()?;
    db.seed_demo_data()?;
    Ok(Arc::new(MediConnect::with_delay(
        db,
        Box::new(FixedDelay::from_millis(300)),
    )))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe core wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MediConnect {
    db: Arc<Mutex<Database>>,
    selector: ReplySelector,
    delay: Box<dyn DelayPolicy>,
}

impl MediConnect {
    fn with_delay(db: Database, delay: Box<dyn DelayPolicy>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            selector: ReplySelector::new(),
            delay,
        }
    }
}

#[uniffi::export]
impl MediConnect {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Search medicines by name or generic name.
    pub fn search_medicines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiMedicine>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let medicines = db.search_medicines(&query, limit as usize)?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let medicine = db.get_medicine(&id)?;
        Ok(medicine.map(|m| m.into()))
    }

    /// List the whole catalog, ordered by name.
    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let medicines = db.list_medicines()?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// List active pharmacies, ordered by name.
    pub fn list_pharmacies(&self) -> Result<Vec<FfiPharmacy>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let pharmacies = db.list_pharmacies()?;
        Ok(pharmacies.into_iter().map(|p| p.into()).collect())
    }

    /// Where a medicine is in stock, cheapest pharmacy first.
    pub fn medicine_availability(
        &self,
        medicine_id: String,
    ) -> Result<Vec<FfiAvailability>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let availability = db.list_availability(&medicine_id)?;
        Ok(availability.into_iter().map(|a| a.into()).collect())
    }

    // =========================================================================
    // Order Operations
    // =========================================================================

    /// Preview how selections would split into per-pharmacy orders.
    ///
    /// Groups are returned in the order their pharmacies first appear
    /// among the selections. Selections without a chosen pharmacy are
    /// left out; if none remain the call fails.
    ///
    /// Computed locally from the given selections; unlike the other
    /// operations it represents no backend call, so the simulated
    /// delay is not applied and the UI can re-render the split on
    /// every quantity change.
    pub fn preview_order_groups(
        &self,
        selections: Vec<FfiSelectionLine>,
    ) -> Result<Vec<FfiOrderGroup>, MediConnectError> {
        let lines: Vec<SelectionLine> = selections.into_iter().map(|s| s.into()).collect();
        let mut groups = aggregate_orders(&lines)?;

        let mut ordered = Vec::with_capacity(groups.len());
        for selection in &lines {
            if let Some(pharmacy_id) = &selection.pharmacy_id {
                if let Some(group) = groups.remove(pharmacy_id) {
                    ordered.push(group.into());
                }
            }
        }
        Ok(ordered)
    }

    /// Place a direct order for one medicine at one pharmacy.
    pub fn place_order(
        &self,
        user_id: String,
        pharmacy_id: String,
        medicine_id: String,
        quantity: u32,
        delivery_address: String,
        delivery_phone: String,
        notes: Option<String>,
    ) -> Result<FfiOrder, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let checkout = Checkout::new(&db);
        let delivery = DeliveryInfo {
            address: delivery_address,
            phone: delivery_phone,
            notes,
        };
        let order =
            checkout.place_direct_order(&user_id, &pharmacy_id, &medicine_id, quantity, &delivery)?;
        Ok(order.into())
    }

    /// Place one order per pharmacy for prescription selections.
    pub fn place_prescription_orders(
        &self,
        user_id: String,
        prescription_id: String,
        selections: Vec<FfiSelectionLine>,
        delivery_address: String,
        delivery_phone: String,
    ) -> Result<Vec<FfiOrder>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let checkout = Checkout::new(&db);
        let lines: Vec<SelectionLine> = selections.into_iter().map(|s| s.into()).collect();
        let delivery = DeliveryInfo {
            address: delivery_address,
            phone: delivery_phone,
            notes: None,
        };
        let orders =
            checkout.place_prescription_orders(&user_id, &prescription_id, &lines, &delivery)?;
        Ok(orders.into_iter().map(|o| o.into()).collect())
    }

    /// List a user's orders, most recent first.
    pub fn list_orders(&self, user_id: String) -> Result<Vec<FfiOrder>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let orders = db.list_orders_for_user(&user_id)?;
        Ok(orders.into_iter().map(|o| o.into()).collect())
    }

    /// List the items of one order.
    pub fn list_order_items(
        &self,
        order_id: String,
    ) -> Result<Vec<FfiOrderItem>, MediConnectError> {
        let db = self.db.lock()?;
        let items = db.list_order_items(&order_id)?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Register a captured prescription image as pending.
    pub fn scan_prescription(
        &self,
        user_id: String,
        image_url: Option<String>,
    ) -> Result<FfiPrescription, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let service = PrescriptionService::new(&db);
        let prescription = service.register_scan(user_id, image_url)?;
        Ok(prescription.into())
    }

    /// Attach extracted text to a pending prescription.
    pub fn attach_prescription_text(
        &self,
        prescription_id: String,
        ocr_text: String,
    ) -> Result<(), MediConnectError> {
        let db = self.db.lock()?;
        let service = PrescriptionService::new(&db);
        service.attach_ocr_text(&prescription_id, &ocr_text)?;
        Ok(())
    }

    /// List a user's prescriptions, most recent first.
    pub fn list_prescriptions(
        &self,
        user_id: String,
    ) -> Result<Vec<FfiPrescription>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let prescriptions = db.list_prescriptions_for_user(&user_id)?;
        Ok(prescriptions.into_iter().map(|p| p.into()).collect())
    }

    /// Match prescription text against the catalog with availability.
    pub fn match_prescription_text(
        &self,
        ocr_text: String,
    ) -> Result<Vec<FfiPrescriptionMatch>, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;
        let service = PrescriptionService::new(&db);
        let matches = service.match_medicines(&ocr_text)?;
        Ok(matches.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Assistant Operations
    // =========================================================================

    /// Canned assistant reply for a message, without persisting anything.
    pub fn assistant_reply(&self, message: String) -> String {
        self.selector.select(&message).to_string()
    }

    /// Start a new chat conversation.
    pub fn start_conversation(
        &self,
        user_id: String,
        title: String,
    ) -> Result<FfiConversation, MediConnectError> {
        let db = self.db.lock()?;
        let conversation = ChatConversation::new(user_id, title);
        db.insert_conversation(&conversation)?;
        Ok(conversation.into())
    }

    /// Append a user message, reply, and return the assistant message.
    pub fn send_chat_message(
        &self,
        conversation_id: String,
        content: String,
    ) -> Result<FfiChatMessage, MediConnectError> {
        self.delay.pause();
        let db = self.db.lock()?;

        let user_message =
            ChatMessage::new(conversation_id.clone(), MessageRole::User, content.clone());
        db.insert_message(&user_message)?;

        let reply = self.selector.select(&content).to_string();
        let assistant_message =
            ChatMessage::new(conversation_id, MessageRole::Assistant, reply);
        db.insert_message(&assistant_message)?;

        Ok(assistant_message.into())
    }

    /// List a conversation's messages, oldest first.
    pub fn list_chat_messages(
        &self,
        conversation_id: String,
    ) -> Result<Vec<FfiChatMessage>, MediConnectError> {
        let db = self.db.lock()?;
        let messages = db.list_messages(&conversation_id)?;
        Ok(messages.into_iter().map(|m| m.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub dosage: Option<String>,
    pub form: Option<String>,
    pub manufacturer: Option<String>,
    pub requires_prescription: bool,
    pub warnings: Option<String>,
}

impl From<Medicine> for FfiMedicine {
    fn from(medicine: Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name,
            generic_name: medicine.generic_name,
            description: medicine.description,
            dosage: medicine.dosage,
            form: medicine.form,
            manufacturer: medicine.manufacturer,
            requires_prescription: medicine.requires_prescription,
            warnings: medicine.warnings,
        }
    }
}

/// One day of a pharmacy's opening hours.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOpeningSlot {
    pub day: String,
    pub hours: String,
}

/// FFI-safe pharmacy.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPharmacy {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: Vec<FfiOpeningSlot>,
    pub is_active: bool,
}

impl From<Pharmacy> for FfiPharmacy {
    fn from(pharmacy: Pharmacy) -> Self {
        Self {
            id: pharmacy.id,
            name: pharmacy.name,
            address: pharmacy.address,
            phone: pharmacy.phone,
            latitude: pharmacy.latitude,
            longitude: pharmacy.longitude,
            opening_hours: pharmacy
                .opening_hours
                .into_iter()
                .map(|(day, hours)| FfiOpeningSlot { day, hours })
                .collect(),
            is_active: pharmacy.is_active,
        }
    }
}

/// FFI-safe stock entry with its pharmacy.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAvailability {
    pub pharmacy: FfiPharmacy,
    pub quantity: u32,
    pub price: f64,
}

impl From<Availability> for FfiAvailability {
    fn from(availability: Availability) -> Self {
        Self {
            pharmacy: availability.pharmacy.into(),
            quantity: availability.inventory.quantity,
            price: availability.inventory.price,
        }
    }
}

/// FFI-safe order selection line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSelectionLine {
    pub medicine_id: String,
    pub pharmacy_id: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
}

impl From<FfiSelectionLine> for SelectionLine {
    fn from(line: FfiSelectionLine) -> Self {
        SelectionLine {
            medicine_id: line.medicine_id,
            pharmacy_id: line.pharmacy_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// FFI-safe priced line of a previewed group.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderLineItem {
    pub medicine_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl From<OrderLineItem> for FfiOrderLineItem {
    fn from(item: OrderLineItem) -> Self {
        Self {
            medicine_id: item.medicine_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// FFI-safe per-pharmacy order preview.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderGroup {
    pub pharmacy_id: String,
    pub items: Vec<FfiOrderLineItem>,
    pub total_amount: f64,
}

impl From<OrderGroup> for FfiOrderGroup {
    fn from(group: OrderGroup) -> Self {
        Self {
            pharmacy_id: group.pharmacy_id,
            items: group.items.into_iter().map(|i| i.into()).collect(),
            total_amount: group.total_amount,
        }
    }
}

/// FFI-safe persisted order.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrder {
    pub id: String,
    pub pharmacy_id: String,
    pub prescription_id: Option<String>,
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_phone: String,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Order> for FfiOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            pharmacy_id: order.pharmacy_id,
            prescription_id: order.prescription_id,
            total_amount: order.total_amount,
            delivery_address: order.delivery_address,
            delivery_phone: order.delivery_phone,
            status: format!("{:?}", order.status),
            payment_status: format!("{:?}", order.payment_status),
            notes: order.notes,
            created_at: order.created_at,
        }
    }
}

/// FFI-safe persisted order item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOrderItem {
    pub id: String,
    pub order_id: String,
    pub medicine_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl From<OrderItem> for FfiOrderItem {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            medicine_id: item.medicine_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub user_id: String,
    pub image_url: Option<String>,
    pub ocr_text: Option<String>,
    pub doctor_name: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(prescription: Prescription) -> Self {
        Self {
            id: prescription.id,
            user_id: prescription.user_id,
            image_url: prescription.image_url,
            ocr_text: prescription.ocr_text,
            doctor_name: prescription.doctor_name,
            status: format!("{:?}", prescription.status),
            created_at: prescription.created_at,
        }
    }
}

/// FFI-safe prescription line match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionMatch {
    pub extracted_name: String,
    pub medicine: Option<FfiMedicine>,
    pub availability: Vec<FfiAvailability>,
}

impl From<PrescriptionMatch> for FfiPrescriptionMatch {
    fn from(matched: PrescriptionMatch) -> Self {
        Self {
            extracted_name: matched.extracted_name,
            medicine: matched.medicine.map(|m| m.into()),
            availability: matched.availability.into_iter().map(|a| a.into()).collect(),
        }
    }
}

/// FFI-safe chat conversation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
}

impl From<ChatConversation> for FfiConversation {
    fn from(conversation: ChatConversation) -> Self {
        Self {
            id: conversation.id,
            user_id: conversation.user_id,
            title: conversation.title,
            created_at: conversation.created_at,
        }
    }
}

/// FFI-safe chat message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

impl From<ChatMessage> for FfiChatMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            role: match message.role {
                MessageRole::User => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
            },
            content: message.content,
            created_at: message.created_at,
        }
    }
}
