//! Rating creation, single and bulk.

use rusqlite::Connection;
use tracing::info;

use crate::db::{insert_rating, Database};
use crate::models::{Branch, Patient, Rating, RatingCategory, Score};
use crate::resolver::resolve_patient;

use super::{require_operator, OpsResult};

/// Input for one rating.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub category: RatingCategory,
    pub score: Score,
    pub phone_number: String,
    pub branch: Branch,
    pub feedback_id: Option<String>,
}

fn persist_rating(
    conn: &Connection,
    operator_id: &str,
    patient: &Patient,
    input: &NewRating,
) -> OpsResult<Rating> {
    let rating = Rating::new(
        input.category,
        input.score,
        input.branch,
        operator_id.to_string(),
        Some(patient.id.clone()),
        input.feedback_id.clone(),
    );
    insert_rating(conn, &rating)?;
    Ok(rating)
}

/// Persist a single rating, resolving the patient in the same transaction.
pub fn create_rating(db: &mut Database, operator_id: &str, input: NewRating) -> OpsResult<Rating> {
    let tx = db.transaction()?;

    require_operator(&tx, operator_id)?;
    let patient = resolve_patient(&tx, &input.phone_number, Some(input.branch))?;
    let rating = persist_rating(&tx, operator_id, &patient, &input)?;

    tx.commit().map_err(crate::db::DbError::from)?;
    info!(rating_id = %rating.id, patient_id = %patient.id, "rating recorded");
    Ok(rating)
}

/// Persist a batch of ratings for one patient contact. Categories the caller
/// left out are filled with the maximum score, so every submission covers
/// all five categories. The whole batch shares one patient resolution.
pub fn create_rating_batch(
    db: &mut Database,
    operator_id: &str,
    phone_number: &str,
    branch: Branch,
    scores: &[(RatingCategory, Score)],
) -> OpsResult<Vec<Rating>> {
    let tx = db.transaction()?;

    require_operator(&tx, operator_id)?;
    let patient = resolve_patient(&tx, phone_number, Some(branch))?;

    let mut ratings = Vec::with_capacity(RatingCategory::ALL.len());
    for category in RatingCategory::ALL {
        let score = scores
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| *s)
            .unwrap_or(Score::MAX);
        let input = NewRating {
            category,
            score,
            phone_number: phone_number.to_string(),
            branch,
            feedback_id: None,
        };
        ratings.push(persist_rating(&tx, operator_id, &patient, &input)?);
    }

    tx.commit().map_err(crate::db::DbError::from)?;
    info!(
        patient_id = %patient.id,
        provided = scores.len(),
        total = ratings.len(),
        "rating batch recorded"
    );
    Ok(ratings)
}
