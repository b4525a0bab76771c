//! Feedback (complaint) table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Feedback, FeedbackCategory};

fn map_feedback_row(row: &Row<'_>) -> rusqlite::Result<Feedback> {
    let category: String = row.get(3)?;
    Ok(Feedback {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        category: FeedbackCategory::parse(&category).unwrap_or(FeedbackCategory::Complaint),
        status: row.get(4)?,
        phone_number: row.get(5)?,
        operator_id: row.get(6)?,
        patient_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

const FEEDBACK_COLUMNS: &str = "id, first_name, last_name, category, status, phone_number, \
                                operator_id, patient_id, created_at, updated_at";

/// Insert a new feedback.
pub fn insert_feedback(conn: &Connection, feedback: &Feedback) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO feedbacks (
            id, first_name, last_name, category, status, phone_number,
            operator_id, patient_id, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            feedback.id,
            feedback.first_name,
            feedback.last_name,
            feedback.category.as_str(),
            feedback.status,
            feedback.phone_number,
            feedback.operator_id,
            feedback.patient_id,
            feedback.created_at,
            feedback.updated_at,
        ],
    )?;
    Ok(())
}

/// Get a feedback by id.
pub fn get_feedback(conn: &Connection, id: &str) -> DbResult<Option<Feedback>> {
    conn.query_row(
        &format!("SELECT {FEEDBACK_COLUMNS} FROM feedbacks WHERE id = ?"),
        [id],
        map_feedback_row,
    )
    .optional()
    .map_err(Into::into)
}

impl Database {
    /// Update the workflow status of a feedback (driven by the external
    /// board's webhook when a card moves between columns).
    pub fn update_feedback_status(&self, id: &str, status: &str) -> DbResult<()> {
        let rows_affected = self.conn.execute(
            "UPDATE feedbacks SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![id, status],
        )?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("feedback {id}")));
        }
        Ok(())
    }

    /// List all feedbacks, newest first.
    pub fn list_feedbacks(&self) -> DbResult<Vec<Feedback>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedbacks ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], map_feedback_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
