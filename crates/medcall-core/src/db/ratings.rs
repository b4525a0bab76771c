//! Rating table operations.

use rusqlite::{params, Connection, Row};

use super::{Database, DbResult};
use crate::models::{Branch, Rating, RatingCategory, Score};

fn map_rating_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    let category: String = row.get(1)?;
    let score: i64 = row.get(2)?;
    let branch: String = row.get(3)?;
    Ok(Rating {
        id: row.get(0)?,
        category: RatingCategory::parse(&category).unwrap_or(RatingCategory::Doctors),
        score: Score::from_value(score).unwrap_or(Score::Five),
        branch: Branch::parse(&branch).unwrap_or(Branch::Tashkent),
        operator_id: row.get(4)?,
        patient_id: row.get(5)?,
        feedback_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const RATING_COLUMNS: &str =
    "id, category, score, branch, operator_id, patient_id, feedback_id, created_at";

/// Insert a new rating.
pub fn insert_rating(conn: &Connection, rating: &Rating) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO ratings (
            id, category, score, branch, operator_id, patient_id, feedback_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            rating.id,
            rating.category.as_str(),
            rating.score.value(),
            rating.branch.as_str(),
            rating.operator_id,
            rating.patient_id,
            rating.feedback_id,
            rating.created_at,
        ],
    )?;
    Ok(())
}

impl Database {
    /// List all ratings, newest first.
    pub fn list_ratings(&self) -> DbResult<Vec<Rating>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], map_rating_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Ratings for a branch with `created_at` in `[from, to_exclusive)`.
    pub fn list_ratings_in_range(
        &self,
        branch: Branch,
        from: &str,
        to_exclusive: &str,
    ) -> DbResult<Vec<Rating>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings
             WHERE branch = ?1 AND created_at >= ?2 AND created_at < ?3"
        ))?;
        let rows = stmt.query_map(params![branch.as_str(), from, to_exclusive], map_rating_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
