//! Prescription intake and catalog matching.
//!
//! A captured image is registered as a pending [`Prescription`]; once
//! OCR text is attached, medicine names are extracted line by line and
//! matched against the catalog with their current availability.

use crate::db::{Database, DbResult};
use crate::models::{Availability, Medicine, Prescription};

/// Maximum number of medicine names extracted from one prescription.
const MAX_EXTRACTED_NAMES: usize = 5;

/// One extracted prescription line matched against the catalog.
#[derive(Debug, Clone)]
pub struct PrescriptionMatch {
    /// Name as it appeared on the prescription
    pub extracted_name: String,
    /// Best catalog match, if any
    pub medicine: Option<Medicine>,
    /// Pharmacies stocking the matched medicine, cheapest first
    pub availability: Vec<Availability>,
}

/// Pull probable medicine names out of raw OCR text.
///
/// Lines are trimmed; lines of three characters or fewer and lines
/// mentioning a doctor ("dr.") are skipped. At most
/// [`MAX_EXTRACTED_NAMES`] names are returned.
pub fn extract_medicine_names(ocr_text: &str) -> Vec<String> {
    ocr_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 3 && !line.to_lowercase().contains("dr."))
        .take(MAX_EXTRACTED_NAMES)
        .map(str::to_string)
        .collect()
}

/// Drop tokens that contain digits, such as "500mg" or "2x".
fn strip_dosage_tokens(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| !word.chars().any(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prescription workflow over an injected database.
pub struct PrescriptionService<'a> {
    db: &'a Database,
}

impl<'a> PrescriptionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a captured prescription image as pending.
    pub fn register_scan(
        &self,
        user_id: String,
        image_url: Option<String>,
    ) -> DbResult<Prescription> {
        let prescription = Prescription::new(user_id, image_url);
        self.db.insert_prescription(&prescription)?;
        Ok(prescription)
    }

    /// Attach OCR text to a pending prescription.
    pub fn attach_ocr_text(&self, prescription_id: &str, ocr_text: &str) -> DbResult<()> {
        self.db
            .update_prescription_ocr_text(prescription_id, ocr_text)
            .map(|_| ())
    }

    /// Match each extracted name against the catalog.
    ///
    /// Dosage tokens like "500mg" are not part of medicine names, so a
    /// line that finds nothing as written is retried without them.
    /// Unrecognized names are kept in the result with no medicine so
    /// the caller can surface them to the user.
    pub fn match_medicines(&self, ocr_text: &str) -> DbResult<Vec<PrescriptionMatch>> {
        let mut matches = Vec::new();
        for name in extract_medicine_names(ocr_text) {
            let mut medicine = self.db.search_medicines(&name, 5)?.into_iter().next();
            if medicine.is_none() {
                let stripped = strip_dosage_tokens(&name);
                if !stripped.is_empty() && stripped != name {
                    medicine = self.db.search_medicines(&stripped, 5)?.into_iter().next();
                }
            }
            let availability = match &medicine {
                Some(med) => self.db.list_availability(&med.id)?,
                None => Vec::new(),
            };
            matches.push(PrescriptionMatch {
                extracted_name: name,
                medicine,
                availability,
            });
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OCR: &str = "Dr. Amadou Diallo\nParacétamol 500mg\nAmoxicilline 500mg\nIbuprofène 400mg\n2x\npar jour";

    #[test]
    fn test_extract_skips_doctor_and_short_lines() {
        let names = extract_medicine_names(SAMPLE_OCR);
        assert_eq!(
            names,
            vec![
                "Paracétamol 500mg",
                "Amoxicilline 500mg",
                "Ibuprofène 400mg",
                "par jour"
            ]
        );
    }

    #[test]
    fn test_extract_caps_at_five() {
        let text = "ligne un\nligne deux\nligne trois\nligne quatre\nligne cinq\nligne six";
        assert_eq!(extract_medicine_names(text).len(), 5);
    }

    #[test]
    fn test_strip_dosage_tokens() {
        assert_eq!(strip_dosage_tokens("Paracétamol 500mg"), "Paracétamol");
        assert_eq!(strip_dosage_tokens("Amoxicilline 500mg 2x"), "Amoxicilline");
        assert_eq!(strip_dosage_tokens("par jour"), "par jour");
        assert_eq!(strip_dosage_tokens("500mg"), "");
    }

    #[test]
    fn test_extract_length_counts_characters_not_bytes() {
        // "été" is five bytes but three characters; it must be dropped
        assert!(extract_medicine_names("été").is_empty());
        assert_eq!(extract_medicine_names("bébé"), vec!["bébé"]);
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_medicine_names("").is_empty());
        assert!(extract_medicine_names("\n\n  \n").is_empty());
    }

    #[test]
    fn test_register_scan_is_pending() {
        let db = Database::open_in_memory().unwrap();
        let service = PrescriptionService::new(&db);

        let prescription = service
            .register_scan("user1".into(), Some("file:///scan.jpg".into()))
            .unwrap();

        let stored = db.get_prescription(&prescription.id).unwrap().unwrap();
        assert!(matches!(
            stored.status,
            crate::models::PrescriptionStatus::Pending
        ));
        assert_eq!(stored.image_url.as_deref(), Some("file:///scan.jpg"));
    }

    #[test]
    fn test_match_medicines_against_seeded_catalog() {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo_data().unwrap();
        let service = PrescriptionService::new(&db);

        let matches = service.match_medicines(SAMPLE_OCR).unwrap();
        assert_eq!(matches.len(), 4);

        let para = &matches[0];
        assert_eq!(para.extracted_name, "Paracétamol 500mg");
        let med = para.medicine.as_ref().unwrap();
        assert_eq!(med.id, "med-paracetamol");
        assert!(!para.availability.is_empty());
        // Cheapest pharmacy first
        assert!(para.availability[0].inventory.price <= para.availability[1].inventory.price);

        assert_eq!(
            matches[1].medicine.as_ref().map(|m| m.id.as_str()),
            Some("med-amoxicilline")
        );
        // "par jour" is a dosage instruction, not a medicine
        assert!(matches[3].medicine.is_none());
    }

    #[test]
    fn test_match_keeps_unrecognized_names() {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo_data().unwrap();
        let service = PrescriptionService::new(&db);

        let matches = service.match_medicines("Potion introuvable 10mg").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].medicine.is_none());
        assert!(matches[0].availability.is_empty());
    }
}
