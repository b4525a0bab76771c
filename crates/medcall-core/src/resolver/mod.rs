//! Patient identity resolution.
//!
//! Every write path (call logging, ratings, complaints) funnels through
//! [`resolve_patient`] before persisting its own record, so any committed
//! transaction leaves at most one canonical identity per phone number.

mod branch;
mod phone;

pub use branch::{BranchMatchError, BranchMatchResult, BranchMatcher, MATCH_THRESHOLD};
pub use phone::{normalize_phone, PhoneError, PhoneResult};

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::db::{
    self, delete_new_duplicates, find_patient_by_phone_status, insert_patient, promote_patient,
    update_patient_branch,
};
use crate::models::{Branch, Patient, PatientStatus};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Db(#[from] db::DbError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolve the canonical patient for a raw phone number, creating or
/// promoting one as needed.
///
/// Must run on a connection that is inside the caller's transaction, so the
/// resolution and the dependent business write commit or roll back together.
/// An invalid phone fails the whole enclosing transaction.
pub fn resolve_patient(
    conn: &Connection,
    raw_phone: &str,
    branch: Option<Branch>,
) -> ResolveResult<Patient> {
    let phone = normalize_phone(raw_phone)?;

    // Established identity wins. Refresh the branch and sweep any stale
    // import leftovers for the same phone.
    if let Some(mut patient) =
        find_patient_by_phone_status(conn, &phone, PatientStatus::Regular)?
    {
        if branch.is_some() && patient.branch != branch {
            update_patient_branch(conn, &patient.id, branch)?;
            patient.branch = branch;
        }
        let swept = delete_new_duplicates(conn, &phone, &patient.id)?;
        if swept > 0 {
            debug!(phone = %phone, swept, "removed stale walk-in duplicates");
        }
        return Ok(patient);
    }

    // A walk-in import row is promoted in place, keeping its row id.
    if let Some(mut patient) = find_patient_by_phone_status(conn, &phone, PatientStatus::New)? {
        promote_patient(conn, &patient.id, branch)?;
        patient.status = PatientStatus::Regular;
        if branch.is_some() {
            patient.branch = branch;
        }
        debug!(phone = %phone, id = %patient.id, "promoted walk-in patient");
        return Ok(patient);
    }

    // First contact. The partial unique index on (phone, REGULAR) turns a
    // concurrent double-create into a constraint failure instead of a
    // duplicate identity.
    let patient = Patient::established(phone.clone(), branch);
    insert_patient(conn, &patient)?;
    debug!(phone = %phone, id = %patient.id, "created patient on first contact");
    Ok(patient)
}
