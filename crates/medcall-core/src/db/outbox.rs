//! Post-commit card outbox.
//!
//! A feedback commit never talks to the external board directly. It enqueues
//! the rendered card request here, inside its own transaction, and a worker
//! drains the queue afterwards. Losing the board never loses the feedback.

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{Database, DbResult};

/// Give up on an outbox entry after this many delivery attempts.
pub const MAX_DELIVERY_ATTEMPTS: i64 = 5;

/// One queued card delivery.
#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub id: String,
    pub feedback_id: String,
    pub payload: String,
    pub status: OutboxStatus,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Done,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "PENDING",
            OutboxStatus::Done => "DONE",
            OutboxStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OutboxStatus::Pending),
            "DONE" => Some(OutboxStatus::Done),
            "FAILED" => Some(OutboxStatus::Failed),
            _ => None,
        }
    }
}

fn map_outbox_row(row: &Row<'_>) -> rusqlite::Result<OutboxEntry> {
    let status: String = row.get(3)?;
    Ok(OutboxEntry {
        id: row.get(0)?,
        feedback_id: row.get(1)?,
        payload: row.get(2)?,
        status: OutboxStatus::parse(&status).unwrap_or(OutboxStatus::Pending),
        attempts: row.get(4)?,
        last_error: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const OUTBOX_COLUMNS: &str =
    "id, feedback_id, payload, status, attempts, last_error, created_at, updated_at";

/// Enqueue a card request for delivery after commit. The payload is stored
/// serialized so the worker needs nothing but this table.
pub fn enqueue_card(
    conn: &Connection,
    feedback_id: &str,
    payload: &impl serde::Serialize,
) -> DbResult<String> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO card_outbox (id, feedback_id, payload) VALUES (?1, ?2, ?3)",
        params![id, feedback_id, serde_json::to_string(payload)?],
    )?;
    Ok(id)
}

/// Record the external card created for a feedback.
pub fn record_board_card(
    conn: &Connection,
    feedback_id: &str,
    card_id: &str,
    list_id: &str,
    board_id: &str,
) -> DbResult<String> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO board_cards (id, feedback_id, card_id, list_id, board_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, feedback_id, card_id, list_id, board_id],
    )?;
    Ok(id)
}

impl Database {
    /// Pending outbox entries, oldest first.
    pub fn list_pending_cards(&self) -> DbResult<Vec<OutboxEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {OUTBOX_COLUMNS} FROM card_outbox
             WHERE status = 'PENDING' ORDER BY created_at ASC"
        ))?;
        let rows = stmt.query_map([], map_outbox_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Mark an entry delivered.
    pub fn mark_card_done(&self, id: &str) -> DbResult<()> {
        self.conn.execute(
            "UPDATE card_outbox SET status = 'DONE', updated_at = datetime('now') WHERE id = ?",
            [id],
        )?;
        Ok(())
    }

    /// Record a failed delivery attempt. The entry stays PENDING until the
    /// attempt budget runs out, then flips to FAILED for manual follow-up.
    pub fn mark_card_attempt_failed(&self, id: &str, error: &str) -> DbResult<OutboxStatus> {
        self.conn.execute(
            r#"
            UPDATE card_outbox SET
                attempts = attempts + 1,
                last_error = ?2,
                status = CASE WHEN attempts + 1 >= ?3 THEN 'FAILED' ELSE 'PENDING' END,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![id, error, MAX_DELIVERY_ATTEMPTS],
        )?;

        let status: String = self.conn.query_row(
            "SELECT status FROM card_outbox WHERE id = ?",
            [id],
            |row| row.get(0),
        )?;
        Ok(OutboxStatus::parse(&status).unwrap_or(OutboxStatus::Pending))
    }

    /// Card mapping for a feedback, if one was delivered.
    pub fn find_card_for_feedback(&self, feedback_id: &str) -> DbResult<Option<String>> {
        use rusqlite::OptionalExtension;
        self.conn
            .query_row(
                "SELECT card_id FROM board_cards WHERE feedback_id = ?",
                [feedback_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_feedback, insert_operator};
    use crate::models::{Feedback, FeedbackCategory, Operator};

    fn setup_feedback(db: &Database) -> Feedback {
        let operator = Operator::new("Гульнора".into(), "operator".into());
        insert_operator(db.conn(), &operator).unwrap();
        let feedback = Feedback::new(
            None,
            None,
            FeedbackCategory::Complaint,
            "+998901234567".into(),
            operator.id,
            None,
        );
        insert_feedback(db.conn(), &feedback).unwrap();
        feedback
    }

    #[test]
    fn test_enqueue_and_drain_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);

        let id = enqueue_card(db.conn(), &feedback.id, &serde_json::json!({})).unwrap();
        assert_eq!(db.list_pending_cards().unwrap().len(), 1);

        db.mark_card_done(&id).unwrap();
        assert!(db.list_pending_cards().unwrap().is_empty());
    }

    #[test]
    fn test_failure_budget() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);
        let id = enqueue_card(db.conn(), &feedback.id, &serde_json::json!({})).unwrap();

        for attempt in 1..MAX_DELIVERY_ATTEMPTS {
            let status = db.mark_card_attempt_failed(&id, "timeout").unwrap();
            assert_eq!(status, OutboxStatus::Pending, "attempt {attempt} should retry");
        }
        let status = db.mark_card_attempt_failed(&id, "timeout").unwrap();
        assert_eq!(status, OutboxStatus::Failed);
        assert!(db.list_pending_cards().unwrap().is_empty());
    }

    #[test]
    fn test_record_board_card() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);

        record_board_card(db.conn(), &feedback.id, "card-1", "list-1", "board-1").unwrap();
        assert_eq!(
            db.find_card_for_feedback(&feedback.id).unwrap().as_deref(),
            Some("card-1")
        );
        assert!(db.find_card_for_feedback("missing").unwrap().is_none());
    }
}
