//! Prescription models.

use serde::{Deserialize, Serialize};

/// Lifecycle of a scanned prescription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PrescriptionStatus {
    /// Image captured, analysis not yet available
    Pending,
    /// Text extracted and medicines ordered
    Processed,
    /// Treatment in progress
    Active,
    /// Treatment finished
    Completed,
}

/// A scanned prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Unique identifier
    pub id: String,
    /// Patient who scanned it
    pub user_id: String,
    /// Captured image location
    pub image_url: Option<String>,
    /// Extracted text, one medicine per line
    pub ocr_text: Option<String>,
    /// Prescribing doctor
    pub doctor_name: Option<String>,
    /// Date written on the prescription (YYYY-MM-DD)
    pub prescription_date: Option<String>,
    /// Lifecycle status
    pub status: PrescriptionStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Prescription {
    /// Register a freshly captured scan, pending analysis.
    pub fn new(user_id: String, image_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            image_url,
            ocr_text: None,
            doctor_name: None,
            prescription_date: None,
            status: PrescriptionStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescription_new_is_pending() {
        let prescription = Prescription::new("user1".into(), Some("file://scan.jpg".into()));
        assert!(matches!(prescription.status, PrescriptionStatus::Pending));
        assert!(prescription.ocr_text.is_none());
        assert_eq!(prescription.id.len(), 36);
    }
}
