//! Inbound message pool operations.
//!
//! Bot messages land here as TEMPORARY rows. When an operator files a
//! feedback the selected messages are claimed in the same transaction,
//! which flips them to CLAIMED and pins the feedback id.

use rusqlite::{params, Connection, Row};

use super::{DbError, DbResult};
use crate::models::{Message, MessageKind, MessageStatus};

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let kind: String = row.get(1)?;
    let status: String = row.get(5)?;
    Ok(Message {
        id: row.get(0)?,
        kind: MessageKind::parse(&kind).unwrap_or(MessageKind::Text),
        sender: row.get(2)?,
        body: row.get(3)?,
        media_url: row.get(4)?,
        status: MessageStatus::parse(&status).unwrap_or(MessageStatus::Temporary),
        feedback_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const MESSAGE_COLUMNS: &str =
    "id, kind, sender, body, media_url, status, feedback_id, created_at";

/// Insert a new inbound message.
pub fn insert_message(conn: &Connection, message: &Message) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO messages (
            id, kind, sender, body, media_url, status, feedback_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            message.id,
            message.kind.as_str(),
            message.sender,
            message.body,
            message.media_url,
            message.status.as_str(),
            message.feedback_id,
            message.created_at,
        ],
    )?;
    Ok(())
}

/// Claim TEMPORARY messages for a feedback. Every requested id must exist and
/// still be unclaimed, otherwise the whole claim is rejected and the caller's
/// transaction rolls back.
pub fn claim_messages(
    conn: &Connection,
    ids: &[String],
    feedback_id: &str,
) -> DbResult<Vec<Message>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE id IN ({placeholders}) AND status = 'TEMPORARY'
         ORDER BY created_at ASC"
    ))?;
    let claimable = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), map_message_row)?
        .collect::<Result<Vec<_>, _>>()?;

    if claimable.len() != ids.len() {
        return Err(DbError::Constraint(format!(
            "cannot claim messages: {} of {} are missing or already claimed",
            ids.len() - claimable.len(),
            ids.len()
        )));
    }

    conn.execute(
        &format!(
            "UPDATE messages SET status = 'CLAIMED', feedback_id = ?1
             WHERE id IN ({placeholders})"
        ),
        rusqlite::params_from_iter(
            std::iter::once(feedback_id.to_string()).chain(ids.iter().cloned()),
        ),
    )?;

    let mut claimed = claimable;
    for message in &mut claimed {
        message.status = MessageStatus::Claimed;
        message.feedback_id = Some(feedback_id.to_string());
    }
    Ok(claimed)
}

/// Messages attached to a feedback, oldest first.
pub fn list_messages_for_feedback(conn: &Connection, feedback_id: &str) -> DbResult<Vec<Message>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE feedback_id = ? ORDER BY created_at ASC"
    ))?;
    let rows = stmt.query_map([feedback_id], map_message_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_feedback, insert_operator, Database};
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
    fn test_claim_flips_status() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);

        let m1 = Message::text("+998901234567".into(), "Очень долго ждали врача".into());
        let m2 = Message::voice("+998901234567".into(), "https://cdn/audio/1.ogg".into());
        insert_message(db.conn(), &m1).unwrap();
        insert_message(db.conn(), &m2).unwrap();

        let claimed =
            claim_messages(db.conn(), &[m1.id.clone(), m2.id.clone()], &feedback.id).unwrap();
        assert_eq!(claimed.len(), 2);
        assert!(claimed
            .iter()
            .all(|m| m.status == MessageStatus::Claimed));

        let attached = list_messages_for_feedback(db.conn(), &feedback.id).unwrap();
        assert_eq!(attached.len(), 2);
    }

    #[test]
    fn test_claim_rejects_already_claimed() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);

        let m1 = Message::text("+998901234567".into(), "Жалоба".into());
        insert_message(db.conn(), &m1).unwrap();
        claim_messages(db.conn(), &[m1.id.clone()], &feedback.id).unwrap();

        let result = claim_messages(db.conn(), &[m1.id.clone()], &feedback.id);
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_claim_rejects_missing_id() {
        let db = Database::open_in_memory().unwrap();
        let feedback = setup_feedback(&db);

        let result = claim_messages(db.conn(), &["missing".to_string()], &feedback.id);
        assert!(matches!(result, Err(DbError::Constraint(_))));
    }
}
