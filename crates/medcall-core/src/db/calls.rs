//! Call record table operations.

use rusqlite::{params, Connection, Row};

use super::{Database, DbResult};
use crate::models::{Branch, CallOutcome, CallRecord};

fn map_call_row(row: &Row<'_>) -> rusqlite::Result<CallRecord> {
    let outcome: String = row.get(1)?;
    let branch: String = row.get(3)?;
    Ok(CallRecord {
        id: row.get(0)?,
        outcome: CallOutcome::parse(&outcome).unwrap_or(CallOutcome::NoAnswer),
        phone_number: row.get(2)?,
        branch: Branch::parse(&branch).unwrap_or(Branch::Tashkent),
        operator_id: row.get(4)?,
        patient_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const CALL_COLUMNS: &str =
    "id, outcome, phone_number, branch, operator_id, patient_id, created_at";

/// Insert a new call record.
pub fn insert_call_record(conn: &Connection, record: &CallRecord) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO call_records (
            id, outcome, phone_number, branch, operator_id, patient_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            record.id,
            record.outcome.as_str(),
            record.phone_number,
            record.branch.as_str(),
            record.operator_id,
            record.patient_id,
            record.created_at,
        ],
    )?;
    Ok(())
}

impl Database {
    /// List all call records, newest first.
    pub fn list_call_records(&self) -> DbResult<Vec<CallRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CALL_COLUMNS} FROM call_records ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], map_call_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count calls for a branch and outcome in `[from, to_exclusive)`.
    pub fn count_calls_in_range(
        &self,
        branch: Branch,
        outcome: Option<CallOutcome>,
        from: &str,
        to_exclusive: &str,
    ) -> DbResult<i64> {
        let count = match outcome {
            Some(outcome) => self.conn.query_row(
                "SELECT COUNT(*) FROM call_records
                 WHERE branch = ?1 AND outcome = ?2 AND created_at >= ?3 AND created_at < ?4",
                params![branch.as_str(), outcome.as_str(), from, to_exclusive],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM call_records
                 WHERE branch = ?1 AND created_at >= ?2 AND created_at < ?3",
                params![branch.as_str(), from, to_exclusive],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }

    /// Delete the most recent call record (operator undo).
    pub fn delete_last_call_record(&self) -> DbResult<bool> {
        let last_id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM call_records ORDER BY created_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match last_id {
            Some(id) => {
                self.conn
                    .execute("DELETE FROM call_records WHERE id = ?", [id])?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::insert_operator;
    use crate::models::Operator;

    fn setup_db() -> (Database, Operator) {
        let db = Database::open_in_memory().unwrap();
        let operator = Operator::new("Гульнора".into(), "operator".into());
        insert_operator(db.conn(), &operator).unwrap();
        (db, operator)
    }

    #[test]
    fn test_insert_and_list() {
        let (db, operator) = setup_db();

        let record = CallRecord::new(
            CallOutcome::NoAnswer,
            "+998901234567".into(),
            Branch::Tashkent,
            operator.id.clone(),
            None,
        );
        insert_call_record(db.conn(), &record).unwrap();

        let records = db.list_call_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, CallOutcome::NoAnswer);
        assert_eq!(records[0].patient_id, None);
    }

    #[test]
    fn test_delete_last() {
        let (db, operator) = setup_db();

        assert!(!db.delete_last_call_record().unwrap());

        let record = CallRecord::new(
            CallOutcome::Answered,
            "+998901234567".into(),
            Branch::Tashkent,
            operator.id.clone(),
            None,
        );
        insert_call_record(db.conn(), &record).unwrap();

        assert!(db.delete_last_call_record().unwrap());
        assert!(db.list_call_records().unwrap().is_empty());
    }
}
