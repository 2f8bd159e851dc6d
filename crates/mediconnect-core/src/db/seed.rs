//! Demo dataset, used by the demo build of the app and by tests.
//!
//! Five common medicines and three Dakar pharmacies with overlapping
//! stock.

use std::collections::BTreeMap;

use super::{Database, DbResult};
use crate::models::{Medicine, Pharmacy, PharmacyInventory};

impl Database {
    /// Load the demo dataset. Idempotent (rows are upserted by id).
    pub fn seed_demo_data(&self) -> DbResult<()> {
        for medicine in demo_medicines() {
            self.upsert_medicine(&medicine)?;
        }
        for pharmacy in demo_pharmacies() {
            self.upsert_pharmacy(&pharmacy)?;
        }
        for inventory in demo_inventory() {
            self.upsert_inventory(&inventory)?;
        }
        Ok(())
    }
}

fn medicine(
    id: &str,
    name: &str,
    generic_name: &str,
    description: &str,
    dosage: &str,
    form: &str,
    manufacturer: &str,
    requires_prescription: bool,
    warnings: &str,
) -> Medicine {
    Medicine {
        id: id.into(),
        name: name.into(),
        generic_name: Some(generic_name.into()),
        description: Some(description.into()),
        dosage: Some(dosage.into()),
        form: Some(form.into()),
        manufacturer: Some(manufacturer.into()),
        requires_prescription,
        warnings: Some(warnings.into()),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn demo_medicines() -> Vec<Medicine> {
    vec![
        medicine(
            "med-paracetamol",
            "Paracétamol",
            "Acétaminophène",
            "Antalgique et antipyrétique",
            "500mg",
            "Comprimé",
            "PharmaCorp",
            false,
            "Ne pas dépasser 4g par jour",
        ),
        medicine(
            "med-doliprane",
            "Doliprane",
            "Paracétamol",
            "Traitement de la fièvre et de la douleur",
            "1000mg",
            "Comprimé",
            "Sanofi",
            false,
            "Ne pas associer avec d'autres médicaments contenant du paracétamol",
        ),
        medicine(
            "med-amoxicilline",
            "Amoxicilline",
            "Amoxicilline",
            "Antibiotique",
            "500mg",
            "Gélule",
            "BioMed",
            true,
            "Traitement complet nécessaire",
        ),
        medicine(
            "med-ibuprofene",
            "Ibuprofène",
            "Ibuprofène",
            "Anti-inflammatoire non stéroïdien",
            "400mg",
            "Comprimé",
            "PharmaCorp",
            false,
            "Prendre au cours des repas",
        ),
        medicine(
            "med-aspirine",
            "Aspirine",
            "Acide acétylsalicylique",
            "Antalgique, antipyrétique et antiagrégant plaquettaire",
            "100mg",
            "Comprimé",
            "Bayer",
            false,
            "Ne pas utiliser chez l'enfant sans avis médical",
        ),
    ]
}

fn pharmacy(
    id: &str,
    name: &str,
    address: &str,
    phone: &str,
    latitude: f64,
    longitude: f64,
    hours: &[(&str, &str)],
) -> Pharmacy {
    Pharmacy {
        id: id.into(),
        name: name.into(),
        address: address.into(),
        phone: phone.into(),
        latitude,
        longitude,
        opening_hours: hours
            .iter()
            .map(|(day, span)| (day.to_string(), span.to_string()))
            .collect::<BTreeMap<_, _>>(),
        is_active: true,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn demo_pharmacies() -> Vec<Pharmacy> {
    vec![
        pharmacy(
            "ph-centrale",
            "Pharmacie Centrale",
            "Avenue de l'Indépendance, Dakar",
            "+221 33 821 12 34",
            14.6937,
            -17.4441,
            &[
                ("lundi", "8:00-20:00"),
                ("mardi", "8:00-20:00"),
                ("mercredi", "8:00-20:00"),
                ("jeudi", "8:00-20:00"),
                ("vendredi", "8:00-20:00"),
                ("samedi", "9:00-18:00"),
                ("dimanche", "Fermé"),
            ],
        ),
        pharmacy(
            "ph-almadies",
            "Pharmacie des Almadies",
            "Route des Almadies, Dakar",
            "+221 33 820 45 67",
            14.7289,
            -17.4927,
            &[
                ("lundi", "8:00-22:00"),
                ("mardi", "8:00-22:00"),
                ("mercredi", "8:00-22:00"),
                ("jeudi", "8:00-22:00"),
                ("vendredi", "8:00-22:00"),
                ("samedi", "8:00-22:00"),
                ("dimanche", "9:00-18:00"),
            ],
        ),
        pharmacy(
            "ph-point-e",
            "Pharmacie du Point E",
            "Point E, Dakar",
            "+221 33 825 78 90",
            14.7167,
            -17.4578,
            &[
                ("lundi", "7:30-21:00"),
                ("mardi", "7:30-21:00"),
                ("mercredi", "7:30-21:00"),
                ("jeudi", "7:30-21:00"),
                ("vendredi", "7:30-21:00"),
                ("samedi", "8:00-20:00"),
                ("dimanche", "10:00-16:00"),
            ],
        ),
    ]
}

fn inventory(
    id: &str,
    pharmacy_id: &str,
    medicine_id: &str,
    quantity: u32,
    price: f64,
    expiry_date: &str,
) -> PharmacyInventory {
    PharmacyInventory {
        id: id.into(),
        pharmacy_id: pharmacy_id.into(),
        medicine_id: medicine_id.into(),
        quantity,
        price,
        expiry_date: Some(expiry_date.into()),
        updated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn demo_inventory() -> Vec<PharmacyInventory> {
    vec![
        inventory("inv-1", "ph-centrale", "med-paracetamol", 150, 500.0, "2025-12-31"),
        inventory("inv-2", "ph-centrale", "med-doliprane", 80, 1200.0, "2025-10-15"),
        inventory("inv-3", "ph-centrale", "med-amoxicilline", 45, 3500.0, "2025-08-20"),
        inventory("inv-4", "ph-almadies", "med-paracetamol", 200, 450.0, "2026-01-30"),
        inventory("inv-5", "ph-almadies", "med-ibuprofene", 120, 800.0, "2025-11-10"),
        inventory("inv-6", "ph-almadies", "med-aspirine", 95, 600.0, "2025-09-25"),
        inventory("inv-7", "ph-point-e", "med-doliprane", 60, 1100.0, "2025-07-18"),
        inventory("inv-8", "ph-point-e", "med-ibuprofene", 85, 750.0, "2025-12-05"),
        inventory("inv-9", "ph-point-e", "med-aspirine", 110, 550.0, "2026-02-14"),
    ]
}
