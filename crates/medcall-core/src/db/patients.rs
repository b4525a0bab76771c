//! Patient table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Branch, Patient, PatientStatus};

fn map_patient_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let status: String = row.get(5)?;
    let branch: Option<String> = row.get(4)?;
    Ok(Patient {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        branch: branch.as_deref().and_then(Branch::parse),
        status: PatientStatus::parse(&status).unwrap_or(PatientStatus::New),
        checkout: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const PATIENT_COLUMNS: &str =
    "id, phone_number, first_name, last_name, branch, status, checkout, created_at, updated_at";

/// Insert a new patient row.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO patients (
            id, phone_number, first_name, last_name, branch,
            status, checkout, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            patient.id,
            patient.phone_number,
            patient.first_name,
            patient.last_name,
            patient.branch.map(|b| b.as_str()),
            patient.status.as_str(),
            patient.checkout,
            patient.created_at,
            patient.updated_at,
        ],
    )?;
    Ok(())
}

/// Get a patient by row id.
pub fn get_patient(conn: &Connection, id: &str) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
        [id],
        map_patient_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Find one patient by canonical phone and status. The partial unique index
/// guarantees at most one REGULAR row; for NEW the oldest row wins so that
/// promotion keeps the earliest identity.
pub fn find_patient_by_phone_status(
    conn: &Connection,
    phone_number: &str,
    status: PatientStatus,
) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!(
            "SELECT {PATIENT_COLUMNS} FROM patients
             WHERE phone_number = ?1 AND status = ?2
             ORDER BY created_at ASC
             LIMIT 1"
        ),
        params![phone_number, status.as_str()],
        map_patient_row,
    )
    .optional()
    .map_err(Into::into)
}

/// All patients whose phone is in the given list. Used by the import
/// pipeline for against-storage deduplication.
pub fn find_patients_by_phones(conn: &Connection, phones: &[String]) -> DbResult<Vec<Patient>> {
    if phones.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; phones.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE phone_number IN ({placeholders})"
    ))?;

    let rows = stmt.query_map(rusqlite::params_from_iter(phones.iter()), map_patient_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Update a patient's branch in place.
pub fn update_patient_branch(conn: &Connection, id: &str, branch: Option<Branch>) -> DbResult<bool> {
    let rows_affected = conn.execute(
        "UPDATE patients SET branch = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![id, branch.map(|b| b.as_str())],
    )?;
    Ok(rows_affected > 0)
}

/// Promote a NEW patient to REGULAR in place (same row, same identity),
/// refreshing the branch at the same time.
pub fn promote_patient(conn: &Connection, id: &str, branch: Option<Branch>) -> DbResult<bool> {
    let rows_affected = conn.execute(
        r#"
        UPDATE patients SET
            status = 'REGULAR',
            branch = COALESCE(?2, branch),
            updated_at = datetime('now')
        WHERE id = ?1
        "#,
        params![id, branch.map(|b| b.as_str())],
    )?;
    Ok(rows_affected > 0)
}

/// Remove stale NEW-status duplicates for a phone number, keeping the given
/// row. Cleanup of import leftovers once a REGULAR identity exists.
pub fn delete_new_duplicates(conn: &Connection, phone_number: &str, keep_id: &str) -> DbResult<usize> {
    let deleted = conn.execute(
        "DELETE FROM patients WHERE phone_number = ?1 AND status = 'NEW' AND id != ?2",
        params![phone_number, keep_id],
    )?;
    Ok(deleted)
}

impl Database {
    /// List patients with the given status, newest first.
    pub fn list_patients_by_status(&self, status: PatientStatus) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE status = ? ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([status.as_str()], map_patient_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Administrative delete. Call/rating/feedback back-references are nulled
    /// by the schema, never cascade-deleted.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count patients for a branch with `created_at` in `[from, to_exclusive)`.
    pub fn count_patients_in_range(
        &self,
        branch: Branch,
        from: &str,
        to_exclusive: &str,
    ) -> DbResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM patients
             WHERE branch = ?1 AND created_at >= ?2 AND created_at < ?3",
            params![branch.as_str(), from, to_exclusive],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let patient = Patient::walk_in(
            "+998901234567".into(),
            Some("Алишер".into()),
            Some("Каримов".into()),
            Some(Branch::Tashkent),
            Some("2026-02-01".into()),
        );
        insert_patient(db.conn(), &patient).unwrap();

        let retrieved = get_patient(db.conn(), &patient.id).unwrap().unwrap();
        assert_eq!(retrieved.phone_number, "+998901234567");
        assert_eq!(retrieved.branch, Some(Branch::Tashkent));
        assert_eq!(retrieved.status, PatientStatus::New);
        assert_eq!(retrieved.checkout.as_deref(), Some("2026-02-01"));
    }

    #[test]
    fn test_find_by_phone_status() {
        let db = setup_db();

        let patient = Patient::established("+998901234567".into(), Some(Branch::Tashkent));
        insert_patient(db.conn(), &patient).unwrap();

        let found = find_patient_by_phone_status(db.conn(), "+998901234567", PatientStatus::Regular)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, patient.id);

        let missing =
            find_patient_by_phone_status(db.conn(), "+998901234567", PatientStatus::New).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_promote_in_place_keeps_identity() {
        let db = setup_db();

        let patient = Patient::walk_in("+998901234567".into(), None, None, None, None);
        insert_patient(db.conn(), &patient).unwrap();

        promote_patient(db.conn(), &patient.id, Some(Branch::Samarkand)).unwrap();

        let promoted = get_patient(db.conn(), &patient.id).unwrap().unwrap();
        assert_eq!(promoted.id, patient.id);
        assert_eq!(promoted.status, PatientStatus::Regular);
        assert_eq!(promoted.branch, Some(Branch::Samarkand));
    }

    #[test]
    fn test_promote_without_branch_keeps_existing() {
        let db = setup_db();

        let patient =
            Patient::walk_in("+998901234567".into(), None, None, Some(Branch::Tashkent), None);
        insert_patient(db.conn(), &patient).unwrap();

        promote_patient(db.conn(), &patient.id, None).unwrap();

        let promoted = get_patient(db.conn(), &patient.id).unwrap().unwrap();
        assert_eq!(promoted.branch, Some(Branch::Tashkent));
    }

    #[test]
    fn test_delete_new_duplicates() {
        let db = setup_db();

        let regular = Patient::established("+998901234567".into(), Some(Branch::Tashkent));
        insert_patient(db.conn(), &regular).unwrap();
        for _ in 0..2 {
            let dup = Patient::walk_in("+998901234567".into(), None, None, None, None);
            insert_patient(db.conn(), &dup).unwrap();
        }
        let other = Patient::walk_in("+998907777777".into(), None, None, None, None);
        insert_patient(db.conn(), &other).unwrap();

        let deleted = delete_new_duplicates(db.conn(), "+998901234567", &regular.id).unwrap();
        assert_eq!(deleted, 2);

        // Unrelated NEW rows survive
        assert!(get_patient(db.conn(), &other.id).unwrap().is_some());
    }

    #[test]
    fn test_find_by_phones_batch() {
        let db = setup_db();

        let p1 = Patient::walk_in("+998901111111".into(), None, None, None, None);
        let p2 = Patient::walk_in("+998902222222".into(), None, None, None, None);
        insert_patient(db.conn(), &p1).unwrap();
        insert_patient(db.conn(), &p2).unwrap();

        let found = find_patients_by_phones(
            db.conn(),
            &["+998901111111".to_string(), "+998909999999".to_string()],
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, p1.id);

        assert!(find_patients_by_phones(db.conn(), &[]).unwrap().is_empty());
    }
}
