//! Complaint intake.

use tracing::info;

use crate::board::CardRequest;
use crate::db::{claim_messages, enqueue_card, insert_feedback, insert_rating, Database};
use crate::models::{
    split_full_name, Branch, Feedback, FeedbackCategory, Rating, RatingCategory, Score,
};
use crate::resolver::resolve_patient;

use super::{require_operator, OpsError, OpsResult};

/// Input for one complaint.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub full_name: Option<String>,
    pub category: FeedbackCategory,
    pub phone_number: String,
    pub branch: Branch,
    /// Pending bot messages to attach. At least one is required.
    pub message_ids: Vec<String>,
    /// Optional rating given alongside the complaint.
    pub rating: Option<(RatingCategory, Score)>,
}

/// File a complaint: claim its messages, resolve the patient and queue the
/// board card, all in one transaction. The card is delivered by the outbox
/// worker after commit; a dead board never fails the complaint.
pub fn create_feedback(
    db: &mut Database,
    operator_id: &str,
    input: NewFeedback,
) -> OpsResult<Feedback> {
    if input.message_ids.is_empty() {
        return Err(OpsError::NoMessages);
    }

    let tx = db.transaction()?;

    require_operator(&tx, operator_id)?;
    let patient = resolve_patient(&tx, &input.phone_number, Some(input.branch))?;

    let (first_name, last_name) = match &input.full_name {
        Some(name) => {
            let (first, last) = split_full_name(name);
            (Some(first), if last.is_empty() { None } else { Some(last) })
        }
        None => (patient.first_name.clone(), patient.last_name.clone()),
    };

    let feedback = Feedback::new(
        first_name,
        last_name,
        input.category,
        patient.phone_number.clone(),
        operator_id.to_string(),
        Some(patient.id.clone()),
    );
    insert_feedback(&tx, &feedback)?;

    let messages = claim_messages(&tx, &input.message_ids, &feedback.id)?;

    if let Some((category, score)) = input.rating {
        let rating = Rating::new(
            category,
            score,
            input.branch,
            operator_id.to_string(),
            Some(patient.id.clone()),
            Some(feedback.id.clone()),
        );
        insert_rating(&tx, &rating)?;
    }

    let card = CardRequest::for_feedback(&feedback, &messages, input.branch.as_str());
    enqueue_card(&tx, &feedback.id, &card)?;

    tx.commit().map_err(crate::db::DbError::from)?;
    info!(
        feedback_id = %feedback.id,
        patient_id = %patient.id,
        messages = messages.len(),
        "complaint recorded, card queued"
    );
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_message, insert_operator, DbError};
    use crate::models::{Message, MessageStatus, Operator, DEFAULT_WORKFLOW_STATUS};

    fn setup() -> (Database, Operator) {
        let db = Database::open_in_memory().unwrap();
        let operator = Operator::new("Гульнора".into(), "operator".into());
        insert_operator(db.conn(), &operator).unwrap();
        (db, operator)
    }

    fn pending_message(db: &Database) -> Message {
        let message = Message::text("+998901234567".into(), "Очень долго ждали врача".into());
        insert_message(db.conn(), &message).unwrap();
        message
    }

    #[test]
    fn test_files_complaint_and_queues_card() {
        let (mut db, operator) = setup();
        let message = pending_message(&db);

        let feedback = create_feedback(
            &mut db,
            &operator.id,
            NewFeedback {
                full_name: Some("Каримов Алишер".into()),
                category: FeedbackCategory::Complaint,
                phone_number: "998901234567".into(),
                branch: Branch::Tashkent,
                message_ids: vec![message.id.clone()],
                rating: Some((RatingCategory::Reception, Score::Two)),
            },
        )
        .unwrap();

        assert_eq!(feedback.status, DEFAULT_WORKFLOW_STATUS);
        assert_eq!(feedback.first_name.as_deref(), Some("Каримов"));
        assert_eq!(feedback.last_name.as_deref(), Some("Алишер"));
        assert!(feedback.patient_id.is_some());

        // Message claimed and linked
        let attached =
            crate::db::list_messages_for_feedback(db.conn(), &feedback.id).unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].status, MessageStatus::Claimed);

        // Linked rating persisted in the same transaction
        let ratings = db.list_ratings().unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].feedback_id.as_deref(), Some(feedback.id.as_str()));
        assert_eq!(ratings[0].score, Score::Two);

        // Card waiting in the outbox
        let pending = db.list_pending_cards().unwrap();
        assert_eq!(pending.len(), 1);
        let card: CardRequest = serde_json::from_str(&pending[0].payload).unwrap();
        assert_eq!(card.feedback_id, feedback.id);
        assert_eq!(card.label, "ТАШКЕНТ");
    }

    #[test]
    fn test_requires_messages() {
        let (mut db, operator) = setup();

        let result = create_feedback(
            &mut db,
            &operator.id,
            NewFeedback {
                full_name: None,
                category: FeedbackCategory::Complaint,
                phone_number: "+998901234567".into(),
                branch: Branch::Tashkent,
                message_ids: vec![],
                rating: None,
            },
        );
        assert!(matches!(result, Err(OpsError::NoMessages)));
    }

    #[test]
    fn test_claimed_message_rejects_whole_transaction() {
        let (mut db, operator) = setup();
        let message = pending_message(&db);

        let file = |db: &mut Database, ids: Vec<String>| {
            create_feedback(
                db,
                &operator.id,
                NewFeedback {
                    full_name: None,
                    category: FeedbackCategory::Complaint,
                    phone_number: "+998901234567".into(),
                    branch: Branch::Tashkent,
                    message_ids: ids,
                    rating: None,
                },
            )
        };

        file(&mut db, vec![message.id.clone()]).unwrap();
        let result = file(&mut db, vec![message.id.clone()]);
        assert!(matches!(
            result,
            Err(OpsError::Db(DbError::Constraint(_)))
        ));

        // The failed attempt left nothing behind
        assert_eq!(db.list_feedbacks().unwrap().len(), 1);
        assert_eq!(db.list_pending_cards().unwrap().len(), 1);
    }

    #[test]
    fn test_anonymous_complaint_inherits_patient_name() {
        let (mut db, operator) = setup();

        // Walk-in import row carrying a name
        let walk_in = crate::models::Patient::walk_in(
            "+998901234567".into(),
            Some("Алишер".into()),
            Some("Каримов".into()),
            None,
            None,
        );
        crate::db::insert_patient(db.conn(), &walk_in).unwrap();
        let message = pending_message(&db);

        let feedback = create_feedback(
            &mut db,
            &operator.id,
            NewFeedback {
                full_name: None,
                category: FeedbackCategory::Suggestion,
                phone_number: "+998901234567".into(),
                branch: Branch::Tashkent,
                message_ids: vec![message.id],
                rating: None,
            },
        )
        .unwrap();

        assert_eq!(feedback.first_name.as_deref(), Some("Алишер"));
        assert_eq!(feedback.patient_id.as_deref(), Some(walk_in.id.as_str()));
    }
}
