//! Catalog database operations: medicines, pharmacies, inventory.

use rusqlite::{params, OptionalExtension, Row};
use strsim::{jaro_winkler, normalized_levenshtein};

use super::{Database, DbError, DbResult};
use crate::models::{Availability, Medicine, Pharmacy, PharmacyInventory};

impl Database {
    /// Insert or update a medicine.
    pub fn upsert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, name, generic_name, description, dosage, form,
                manufacturer, requires_prescription, warnings, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                generic_name = excluded.generic_name,
                description = excluded.description,
                dosage = excluded.dosage,
                form = excluded.form,
                manufacturer = excluded.manufacturer,
                requires_prescription = excluded.requires_prescription,
                warnings = excluded.warnings
            "#,
            params![
                medicine.id,
                medicine.name,
                medicine.generic_name,
                medicine.description,
                medicine.dosage,
                medicine.form,
                medicine.manufacturer,
                medicine.requires_prescription,
                medicine.warnings,
                medicine.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, name, generic_name, description, dosage, form,
                       manufacturer, requires_prescription, warnings, created_at
                FROM medicines
                WHERE id = ?
                "#,
                [id],
                medicine_from_row,
            )
            .optional()?;
        Ok(result)
    }

    /// Search medicines by name or generic name (FTS5 prefix match),
    /// ranked by fuzzy similarity to the query.
    pub fn search_medicines(&self, query: &str, limit: usize) -> DbResult<Vec<Medicine>> {
        let escaped_query = escape_fts_query(query);
        if escaped_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.id, m.name, m.generic_name, m.description, m.dosage, m.form,
                   m.manufacturer, m.requires_prescription, m.warnings, m.created_at
            FROM medicines m
            JOIN medicines_fts fts ON m.rowid = fts.rowid
            WHERE medicines_fts MATCH ?
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![escaped_query, limit as i64], medicine_from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?);
        }

        // Rank by similarity to the query so "parac" surfaces
        // Paracétamol before medicines that merely mention it.
        let query_lower = query.to_lowercase();
        medicines.sort_by(|a, b| {
            let score_a = medicine_similarity(&query_lower, a);
            let score_b = medicine_similarity(&query_lower, b);
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(medicines)
    }

    /// Get all medicines, ordered by name.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, generic_name, description, dosage, form,
                   manufacturer, requires_prescription, warnings, created_at
            FROM medicines
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], medicine_from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?);
        }
        Ok(medicines)
    }

    /// Insert or update a pharmacy.
    pub fn upsert_pharmacy(&self, pharmacy: &Pharmacy) -> DbResult<()> {
        let opening_hours_json = serde_json::to_string(&pharmacy.opening_hours)?;

        self.conn.execute(
            r#"
            INSERT INTO pharmacies (
                id, name, address, phone, latitude, longitude,
                opening_hours, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                opening_hours = excluded.opening_hours,
                is_active = excluded.is_active
            "#,
            params![
                pharmacy.id,
                pharmacy.name,
                pharmacy.address,
                pharmacy.phone,
                pharmacy.latitude,
                pharmacy.longitude,
                opening_hours_json,
                pharmacy.is_active,
                pharmacy.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a pharmacy by id.
    pub fn get_pharmacy(&self, id: &str) -> DbResult<Option<Pharmacy>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, address, phone, latitude, longitude,
                       opening_hours, is_active, created_at
                FROM pharmacies
                WHERE id = ?
                "#,
                [id],
                pharmacy_row_from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List active pharmacies, ordered by name.
    pub fn list_pharmacies(&self) -> DbResult<Vec<Pharmacy>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, address, phone, latitude, longitude,
                   opening_hours, is_active, created_at
            FROM pharmacies
            WHERE is_active = 1
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], pharmacy_row_from_row)?;

        let mut pharmacies = Vec::new();
        for row in rows {
            pharmacies.push(row?.try_into()?);
        }
        Ok(pharmacies)
    }

    /// Insert or update an inventory row.
    pub fn upsert_inventory(&self, inventory: &PharmacyInventory) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pharmacy_inventory (
                id, pharmacy_id, medicine_id, quantity, price, expiry_date, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
            ON CONFLICT(pharmacy_id, medicine_id) DO UPDATE SET
                quantity = excluded.quantity,
                price = excluded.price,
                expiry_date = excluded.expiry_date,
                updated_at = datetime('now')
            "#,
            params![
                inventory.id,
                inventory.pharmacy_id,
                inventory.medicine_id,
                inventory.quantity,
                inventory.price,
                inventory.expiry_date,
            ],
        )?;
        Ok(())
    }

    /// Get the inventory row for a medicine at a pharmacy.
    pub fn get_inventory(
        &self,
        pharmacy_id: &str,
        medicine_id: &str,
    ) -> DbResult<Option<PharmacyInventory>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, pharmacy_id, medicine_id, quantity, price, expiry_date, updated_at
                FROM pharmacy_inventory
                WHERE pharmacy_id = ?1 AND medicine_id = ?2
                "#,
                params![pharmacy_id, medicine_id],
                inventory_from_row,
            )
            .optional()?;
        Ok(result)
    }

    /// List where a medicine is in stock, joined with the pharmacy.
    ///
    /// Only rows with quantity > 0 at active pharmacies are returned,
    /// cheapest first.
    pub fn list_availability(&self, medicine_id: &str) -> DbResult<Vec<Availability>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT i.id, i.pharmacy_id, i.medicine_id, i.quantity, i.price,
                   i.expiry_date, i.updated_at,
                   p.id, p.name, p.address, p.phone, p.latitude, p.longitude,
                   p.opening_hours, p.is_active, p.created_at
            FROM pharmacy_inventory i
            JOIN pharmacies p ON p.id = i.pharmacy_id
            WHERE i.medicine_id = ? AND i.quantity > 0 AND p.is_active = 1
            ORDER BY i.price ASC
            "#,
        )?;

        let rows = stmt.query_map([medicine_id], |row| {
            let inventory = PharmacyInventory {
                id: row.get(0)?,
                pharmacy_id: row.get(1)?,
                medicine_id: row.get(2)?,
                quantity: row.get(3)?,
                price: row.get(4)?,
                expiry_date: row.get(5)?,
                updated_at: row.get(6)?,
            };
            let pharmacy = PharmacyRow {
                id: row.get(7)?,
                name: row.get(8)?,
                address: row.get(9)?,
                phone: row.get(10)?,
                latitude: row.get(11)?,
                longitude: row.get(12)?,
                opening_hours: row.get(13)?,
                is_active: row.get(14)?,
                created_at: row.get(15)?,
            };
            Ok((inventory, pharmacy))
        })?;

        let mut availability = Vec::new();
        for row in rows {
            let (inventory, pharmacy_row) = row?;
            availability.push(Availability {
                inventory,
                pharmacy: pharmacy_row.try_into()?,
            });
        }
        Ok(availability)
    }
}

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        name: row.get(1)?,
        generic_name: row.get(2)?,
        description: row.get(3)?,
        dosage: row.get(4)?,
        form: row.get(5)?,
        manufacturer: row.get(6)?,
        requires_prescription: row.get(7)?,
        warnings: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn inventory_from_row(row: &Row<'_>) -> rusqlite::Result<PharmacyInventory> {
    Ok(PharmacyInventory {
        id: row.get(0)?,
        pharmacy_id: row.get(1)?,
        medicine_id: row.get(2)?,
        quantity: row.get(3)?,
        price: row.get(4)?,
        expiry_date: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Intermediate row struct for database mapping.
struct PharmacyRow {
    id: String,
    name: String,
    address: String,
    phone: String,
    latitude: f64,
    longitude: f64,
    opening_hours: String,
    is_active: bool,
    created_at: String,
}

fn pharmacy_row_from_row(row: &Row<'_>) -> rusqlite::Result<PharmacyRow> {
    Ok(PharmacyRow {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        opening_hours: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl TryFrom<PharmacyRow> for Pharmacy {
    type Error = DbError;

    fn try_from(row: PharmacyRow) -> Result<Self, Self::Error> {
        Ok(Pharmacy {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            latitude: row.latitude,
            longitude: row.longitude,
            opening_hours: serde_json::from_str(&row.opening_hours)?,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// Fuzzy similarity of a query against a medicine's names.
fn medicine_similarity(query_lower: &str, medicine: &Medicine) -> f64 {
    let name_score = fuzzy_match(query_lower, &medicine.name.to_lowercase());
    let generic_score = medicine
        .generic_name
        .as_ref()
        .map(|g| fuzzy_match(query_lower, &g.to_lowercase()))
        .unwrap_or(0.0);
    name_score.max(generic_score)
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes, which suits incremental
    // search-as-you-type queries; Levenshtein covers overall similarity.
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}

/// Escape special FTS5 characters and prepare query for prefix matching.
fn escape_fts_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_medicine(name: &str, generic: Option<&str>) -> Medicine {
        let mut med = Medicine::new(name.into());
        med.generic_name = generic.map(|g| g.into());
        med
    }

    #[test]
    fn test_upsert_and_get_medicine() {
        let db = setup_db();

        let mut med = make_medicine("Paracétamol", Some("Acétaminophène"));
        med.dosage = Some("500mg".into());
        med.requires_prescription = false;
        db.upsert_medicine(&med).unwrap();

        let retrieved = db.get_medicine(&med.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Paracétamol");
        assert_eq!(retrieved.dosage.as_deref(), Some("500mg"));
    }

    #[test]
    fn test_upsert_medicine_updates() {
        let db = setup_db();

        let mut med = make_medicine("Original", None);
        db.upsert_medicine(&med).unwrap();

        med.name = "Updated".into();
        db.upsert_medicine(&med).unwrap();

        let retrieved = db.get_medicine(&med.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Updated");
    }

    #[test]
    fn test_search_medicines() {
        let db = setup_db();

        db.upsert_medicine(&make_medicine("Paracétamol", Some("Acétaminophène")))
            .unwrap();
        db.upsert_medicine(&make_medicine("Doliprane", Some("Paracétamol")))
            .unwrap();
        db.upsert_medicine(&make_medicine("Ibuprofène", None)).unwrap();

        // Prefix search by name
        let results = db.search_medicines("parac", 10).unwrap();
        assert_eq!(results.len(), 2);
        // The medicine named Paracétamol ranks above the one whose
        // generic name matches.
        assert_eq!(results[0].name, "Paracétamol");

        // Search by generic name only
        let results = db.search_medicines("acétaminophène", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Paracétamol");

        // No match
        let results = db.search_medicines("aspirine", 10).unwrap();
        assert!(results.is_empty());

        // Blank query
        let results = db.search_medicines("  ", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_pharmacy_roundtrip_with_opening_hours() {
        let db = setup_db();

        let mut pharmacy = Pharmacy::new(
            "Pharmacie Centrale".into(),
            "Avenue de l'Indépendance, Dakar".into(),
            "+221 33 821 12 34".into(),
        );
        pharmacy
            .opening_hours
            .insert("lundi".into(), "8:00-20:00".into());
        pharmacy
            .opening_hours
            .insert("dimanche".into(), "Fermé".into());
        db.upsert_pharmacy(&pharmacy).unwrap();

        let retrieved = db.get_pharmacy(&pharmacy.id).unwrap().unwrap();
        assert_eq!(retrieved.opening_hours["lundi"], "8:00-20:00");
        assert_eq!(retrieved.opening_hours["dimanche"], "Fermé");
    }

    #[test]
    fn test_inventory_upsert_replaces_stock() {
        let db = setup_db();

        let med = make_medicine("Doliprane", None);
        let pharmacy = Pharmacy::new("P".into(), "A".into(), "0".into());
        db.upsert_medicine(&med).unwrap();
        db.upsert_pharmacy(&pharmacy).unwrap();

        let mut inv = PharmacyInventory::new(pharmacy.id.clone(), med.id.clone(), 80, 1200.0);
        db.upsert_inventory(&inv).unwrap();

        inv.quantity = 60;
        inv.price = 1100.0;
        db.upsert_inventory(&inv).unwrap();

        let retrieved = db.get_inventory(&pharmacy.id, &med.id).unwrap().unwrap();
        assert_eq!(retrieved.quantity, 60);
        assert_eq!(retrieved.price, 1100.0);
    }

    #[test]
    fn test_list_availability_skips_out_of_stock() {
        let db = setup_db();

        let med = make_medicine("Doliprane", None);
        db.upsert_medicine(&med).unwrap();

        let stocked = Pharmacy::new("Stocked".into(), "A".into(), "0".into());
        let empty = Pharmacy::new("Empty".into(), "B".into(), "1".into());
        db.upsert_pharmacy(&stocked).unwrap();
        db.upsert_pharmacy(&empty).unwrap();

        db.upsert_inventory(&PharmacyInventory::new(
            stocked.id.clone(),
            med.id.clone(),
            80,
            1200.0,
        ))
        .unwrap();
        db.upsert_inventory(&PharmacyInventory::new(
            empty.id.clone(),
            med.id.clone(),
            0,
            1100.0,
        ))
        .unwrap();

        let availability = db.list_availability(&med.id).unwrap();
        assert_eq!(availability.len(), 1);
        assert_eq!(availability[0].pharmacy.name, "Stocked");
    }

    #[test]
    fn test_list_availability_cheapest_first() {
        let db = setup_db();

        let med = make_medicine("Paracétamol", None);
        db.upsert_medicine(&med).unwrap();

        let p1 = Pharmacy::new("Central".into(), "A".into(), "0".into());
        let p2 = Pharmacy::new("Almadies".into(), "B".into(), "1".into());
        db.upsert_pharmacy(&p1).unwrap();
        db.upsert_pharmacy(&p2).unwrap();

        db.upsert_inventory(&PharmacyInventory::new(p1.id.clone(), med.id.clone(), 150, 500.0))
            .unwrap();
        db.upsert_inventory(&PharmacyInventory::new(p2.id.clone(), med.id.clone(), 200, 450.0))
            .unwrap();

        let availability = db.list_availability(&med.id).unwrap();
        assert_eq!(availability.len(), 2);
        assert_eq!(availability[0].inventory.price, 450.0);
        assert_eq!(availability[1].inventory.price, 500.0);
    }
}
