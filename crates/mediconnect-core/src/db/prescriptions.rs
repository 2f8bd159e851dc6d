//! Prescription database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Prescription, PrescriptionStatus};

impl Database {
    /// Insert a new prescription.
    pub fn insert_prescription(&self, prescription: &Prescription) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO prescriptions (
                id, user_id, image_url, ocr_text, doctor_name,
                prescription_date, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                prescription.id,
                prescription.user_id,
                prescription.image_url,
                prescription.ocr_text,
                prescription.doctor_name,
                prescription.prescription_date,
                prescription_status_to_string(&prescription.status),
                prescription.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a prescription by id.
    pub fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        self.conn
            .query_row(
                r#"
                SELECT id, user_id, image_url, ocr_text, doctor_name,
                       prescription_date, status, created_at
                FROM prescriptions
                WHERE id = ?
                "#,
                [id],
                prescription_row_from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a user's prescriptions, most recent first.
    pub fn list_prescriptions_for_user(&self, user_id: &str) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, image_url, ocr_text, doctor_name,
                   prescription_date, status, created_at
            FROM prescriptions
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([user_id], prescription_row_from_row)?;

        let mut prescriptions = Vec::new();
        for row in rows {
            prescriptions.push(row?.try_into()?);
        }
        Ok(prescriptions)
    }

    /// Update a prescription's lifecycle status.
    pub fn update_prescription_status(
        &self,
        id: &str,
        status: PrescriptionStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE prescriptions SET status = ?2 WHERE id = ?1",
            params![id, prescription_status_to_string(&status)],
        )?;
        Ok(rows_affected > 0)
    }

    /// Attach extracted text to a prescription (mock OCR result).
    pub fn update_prescription_ocr_text(&self, id: &str, ocr_text: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE prescriptions SET ocr_text = ?2 WHERE id = ?1",
            params![id, ocr_text],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PrescriptionRow {
    id: String,
    user_id: String,
    image_url: Option<String>,
    ocr_text: Option<String>,
    doctor_name: Option<String>,
    prescription_date: Option<String>,
    status: String,
    created_at: String,
}

fn prescription_row_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PrescriptionRow> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        image_url: row.get(2)?,
        ocr_text: row.get(3)?,
        doctor_name: row.get(4)?,
        prescription_date: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = DbError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        Ok(Prescription {
            id: row.id,
            user_id: row.user_id,
            image_url: row.image_url,
            ocr_text: row.ocr_text,
            doctor_name: row.doctor_name,
            prescription_date: row.prescription_date,
            status: string_to_prescription_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

fn prescription_status_to_string(status: &PrescriptionStatus) -> &'static str {
    match status {
        PrescriptionStatus::Pending => "pending",
        PrescriptionStatus::Processed => "processed",
        PrescriptionStatus::Active => "active",
        PrescriptionStatus::Completed => "completed",
    }
}

fn string_to_prescription_status(s: &str) -> Result<PrescriptionStatus, DbError> {
    match s {
        "pending" => Ok(PrescriptionStatus::Pending),
        "processed" => Ok(PrescriptionStatus::Processed),
        "active" => Ok(PrescriptionStatus::Active),
        "completed" => Ok(PrescriptionStatus::Completed),
        _ => Err(DbError::Constraint(format!(
            "Unknown prescription status: {}",
            s
        ))),
    }
}
