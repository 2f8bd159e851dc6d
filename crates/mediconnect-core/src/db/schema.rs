//! SQLite schema definition.

/// Complete database schema for the MediConnect core.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Medicine Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    generic_name TEXT,
    description TEXT,
    dosage TEXT,
    form TEXT,
    manufacturer TEXT,
    requires_prescription INTEGER NOT NULL DEFAULT 0,
    warnings TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- FTS5 virtual table for medicine name search
CREATE VIRTUAL TABLE IF NOT EXISTS medicines_fts USING fts5(
    id,
    name,
    generic_name,
    content='medicines',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS medicines_ai AFTER INSERT ON medicines BEGIN
    INSERT INTO medicines_fts(rowid, id, name, generic_name)
    VALUES (new.rowid, new.id, new.name, new.generic_name);
END;

CREATE TRIGGER IF NOT EXISTS medicines_ad AFTER DELETE ON medicines BEGIN
    INSERT INTO medicines_fts(medicines_fts, rowid, id, name, generic_name)
    VALUES ('delete', old.rowid, old.id, old.name, old.generic_name);
END;

CREATE TRIGGER IF NOT EXISTS medicines_au AFTER UPDATE ON medicines BEGIN
    INSERT INTO medicines_fts(medicines_fts, rowid, id, name, generic_name)
    VALUES ('delete', old.rowid, old.id, old.name, old.generic_name);
    INSERT INTO medicines_fts(rowid, id, name, generic_name)
    VALUES (new.rowid, new.id, new.name, new.generic_name);
END;

-- ============================================================================
-- Pharmacies
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    phone TEXT NOT NULL,
    latitude REAL NOT NULL DEFAULT 0,
    longitude REAL NOT NULL DEFAULT 0,
    opening_hours TEXT NOT NULL DEFAULT '{}',    -- JSON object day -> hours
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pharmacies_name ON pharmacies(name);

-- ============================================================================
-- Pharmacy Inventory
-- ============================================================================

CREATE TABLE IF NOT EXISTS pharmacy_inventory (
    id TEXT PRIMARY KEY,
    pharmacy_id TEXT NOT NULL REFERENCES pharmacies(id),
    medicine_id TEXT NOT NULL REFERENCES medicines(id),
    quantity INTEGER NOT NULL DEFAULT 0,
    price REAL NOT NULL DEFAULT 0,
    expiry_date TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(pharmacy_id, medicine_id)
);

CREATE INDEX IF NOT EXISTS idx_inventory_medicine ON pharmacy_inventory(medicine_id);
CREATE INDEX IF NOT EXISTS idx_inventory_pharmacy ON pharmacy_inventory(pharmacy_id);

-- ============================================================================
-- Orders
-- ============================================================================

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    pharmacy_id TEXT NOT NULL REFERENCES pharmacies(id),
    prescription_id TEXT REFERENCES prescriptions(id),
    total_amount REAL NOT NULL DEFAULT 0,
    delivery_address TEXT NOT NULL,
    delivery_phone TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',      -- pending, confirmed, preparing, delivering, delivered, cancelled
    payment_status TEXT NOT NULL DEFAULT 'pending', -- pending, paid, failed
    payment_method TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id);
CREATE INDEX IF NOT EXISTS idx_orders_pharmacy ON orders(pharmacy_id);
CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status);

CREATE TABLE IF NOT EXISTS order_items (
    id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES orders(id),
    medicine_id TEXT NOT NULL REFERENCES medicines(id),
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL,
    subtotal REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);

-- ============================================================================
-- Prescriptions
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    image_url TEXT,
    ocr_text TEXT,
    doctor_name TEXT,
    prescription_date TEXT,
    status TEXT NOT NULL DEFAULT 'pending',      -- pending, processed, active, completed
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_user ON prescriptions(user_id);
CREATE INDEX IF NOT EXISTS idx_prescriptions_status ON prescriptions(status);

-- ============================================================================
-- Chat
-- ============================================================================

CREATE TABLE IF NOT EXISTS chat_conversations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_conversations_user ON chat_conversations(user_id);

CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    conversation_id TEXT NOT NULL REFERENCES chat_conversations(id),
    role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_messages_conversation ON chat_messages(conversation_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_fts_trigger() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO medicines (id, name, generic_name) VALUES (?, ?, ?)",
            ["m1", "Doliprane", "Paracétamol"],
        )
        .unwrap();

        // Search by name
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM medicines_fts WHERE medicines_fts MATCH 'doliprane'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // Search by generic name
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM medicines_fts WHERE medicines_fts MATCH 'paracétamol'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_inventory_unique_per_pharmacy_medicine() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO medicines (id, name) VALUES ('m1', 'Test')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO pharmacies (id, name, address, phone) VALUES ('p1', 'Test', 'A', '0')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO pharmacy_inventory (id, pharmacy_id, medicine_id, quantity, price)
             VALUES ('i1', 'p1', 'm1', 10, 500)",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO pharmacy_inventory (id, pharmacy_id, medicine_id, quantity, price)
             VALUES ('i2', 'p1', 'm1', 5, 400)",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_message_role_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO chat_conversations (id, user_id, title) VALUES ('c1', 'u1', 'Santé')",
            [],
        )
        .unwrap();

        let bad_role = conn.execute(
            "INSERT INTO chat_messages (id, conversation_id, role, content)
             VALUES ('x1', 'c1', 'robot', 'hi')",
            [],
        );
        assert!(bad_role.is_err());
    }
}
