//! Call status logging.

use tracing::info;

use crate::db::{insert_call_record, Database};
use crate::models::{Branch, CallOutcome, CallRecord};
use crate::resolver::resolve_patient;

use super::{require_operator, OpsResult};

/// Input for one logged call.
#[derive(Debug, Clone)]
pub struct NewCallRecord {
    pub outcome: CallOutcome,
    pub phone_number: String,
    pub branch: Branch,
}

/// Log a call, resolving the patient identity in the same transaction.
pub fn create_call_record(
    db: &mut Database,
    operator_id: &str,
    input: NewCallRecord,
) -> OpsResult<CallRecord> {
    let tx = db.transaction()?;

    require_operator(&tx, operator_id)?;
    let patient = resolve_patient(&tx, &input.phone_number, Some(input.branch))?;

    let record = CallRecord::new(
        input.outcome,
        patient.phone_number.clone(),
        input.branch,
        operator_id.to_string(),
        Some(patient.id.clone()),
    );
    insert_call_record(&tx, &record)?;

    tx.commit().map_err(crate::db::DbError::from)?;
    info!(
        call_id = %record.id,
        patient_id = %patient.id,
        outcome = record.outcome.as_str(),
        "call recorded"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::insert_operator;
    use crate::models::{Operator, PatientStatus};
    use crate::ops::OpsError;

    fn setup() -> (Database, Operator) {
        let db = Database::open_in_memory().unwrap();
        let operator = Operator::new("Гульнора".into(), "operator".into());
        insert_operator(db.conn(), &operator).unwrap();
        (db, operator)
    }

    #[test]
    fn test_creates_patient_on_first_call() {
        let (mut db, operator) = setup();

        let record = create_call_record(
            &mut db,
            &operator.id,
            NewCallRecord {
                outcome: CallOutcome::Answered,
                phone_number: "998901234567".into(),
                branch: Branch::Tashkent,
            },
        )
        .unwrap();

        assert_eq!(record.phone_number, "+998901234567");
        let regulars = db.list_patients_by_status(PatientStatus::Regular).unwrap();
        assert_eq!(regulars.len(), 1);
        assert_eq!(record.patient_id.as_deref(), Some(regulars[0].id.as_str()));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let (mut db, _) = setup();

        let result = create_call_record(
            &mut db,
            "missing",
            NewCallRecord {
                outcome: CallOutcome::NoAnswer,
                phone_number: "+998901234567".into(),
                branch: Branch::Tashkent,
            },
        );
        assert!(matches!(result, Err(OpsError::OperatorNotFound(_))));
        // Nothing committed
        assert!(db.list_patients_by_status(PatientStatus::Regular).unwrap().is_empty());
        assert!(db.list_call_records().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_phone_rolls_back_everything() {
        let (mut db, operator) = setup();

        let result = create_call_record(
            &mut db,
            &operator.id,
            NewCallRecord {
                outcome: CallOutcome::NoAnswer,
                phone_number: "12345".into(),
                branch: Branch::Tashkent,
            },
        );
        assert!(result.is_err());
        assert!(db.list_call_records().unwrap().is_empty());
    }
}
