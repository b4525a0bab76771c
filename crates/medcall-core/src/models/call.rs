//! Call record models.

use serde::{Deserialize, Serialize};

use super::Branch;

/// Outcome of one phone-call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallOutcome {
    NoAnswer,
    WrongNumber,
    NoConnection,
    Answered,
}

impl CallOutcome {
    pub const ALL: [CallOutcome; 4] = [
        CallOutcome::NoAnswer,
        CallOutcome::WrongNumber,
        CallOutcome::NoConnection,
        CallOutcome::Answered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::NoAnswer => "NO_ANSWER",
            CallOutcome::WrongNumber => "WRONG_NUMBER",
            CallOutcome::NoConnection => "NO_CONNECTION",
            CallOutcome::Answered => "ANSWERED",
        }
    }

    pub fn parse(s: &str) -> Option<CallOutcome> {
        CallOutcome::ALL.iter().copied().find(|o| o.as_str() == s)
    }
}

/// One phone-call outcome logged by an operator.
///
/// The patient reference is nullable on purpose: call history survives an
/// administrative delete of the patient row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRecord {
    pub id: String,
    pub outcome: CallOutcome,
    pub phone_number: String,
    pub branch: Branch,
    pub operator_id: String,
    pub patient_id: Option<String>,
    pub created_at: String,
}

impl CallRecord {
    pub fn new(
        outcome: CallOutcome,
        phone_number: String,
        branch: Branch,
        operator_id: String,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            outcome,
            phone_number,
            branch,
            operator_id,
            patient_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
