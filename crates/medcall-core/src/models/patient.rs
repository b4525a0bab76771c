//! Patient models.

use serde::{Deserialize, Serialize};

use super::Branch;

/// Lifecycle status of a patient record.
///
/// `New` marks a first walk-in contact (typically a bulk import row) with no
/// confirmed follow-up engagement. `Regular` is the terminal promotion state,
/// reached the first time any business event (call, rating, complaint)
/// references the patient's phone number. At most one `Regular` row may exist
/// per canonical phone number; `New` duplicates may transiently coexist and
/// are collapsed on the next resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    New,
    Regular,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::New => "NEW",
            PatientStatus::Regular => "REGULAR",
        }
    }

    pub fn parse(s: &str) -> Option<PatientStatus> {
        match s {
            "NEW" => Some(PatientStatus::New),
            "REGULAR" => Some(PatientStatus::Regular),
            _ => None,
        }
    }
}

/// Canonical identity for a phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Row UUID.
    pub id: String,
    /// Canonical phone number (`+` plus digits).
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub branch: Option<Branch>,
    pub status: PatientStatus,
    /// Checkout date carried from the import file's date-separator rows
    /// (ISO calendar date, free text at the storage level).
    pub checkout: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Patient {
    /// Create a walk-in patient at `New` status, as the import pipeline does.
    pub fn walk_in(
        phone_number: String,
        first_name: Option<String>,
        last_name: Option<String>,
        branch: Option<Branch>,
        checkout: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            phone_number,
            first_name,
            last_name,
            branch,
            status: PatientStatus::New,
            checkout,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Create a patient directly at `Regular` status, as the identity
    /// resolver does on first contact through a business write.
    pub fn established(phone_number: String, branch: Option<Branch>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            phone_number,
            first_name: None,
            last_name: None,
            branch,
            status: PatientStatus::Regular,
            checkout: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Display name, empty when both name parts are missing.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Split a free-form full-name cell into (first name, last name).
///
/// First whitespace-separated token becomes the first name; the remaining
/// tokens, joined, become the last name. A single-token name yields an empty
/// last name, which is allowed.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();
    (first, rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_in_patient() {
        let patient = Patient::walk_in(
            "+998901234567".into(),
            Some("Алишер".into()),
            Some("Каримов".into()),
            Some(Branch::Tashkent),
            Some("2026-02-01".into()),
        );
        assert_eq!(patient.status, PatientStatus::New);
        assert_eq!(patient.id.len(), 36); // UUID format
        assert_eq!(patient.full_name(), "Алишер Каримов");
    }

    #[test]
    fn test_established_patient() {
        let patient = Patient::established("+998901234567".into(), None);
        assert_eq!(patient.status, PatientStatus::Regular);
        assert!(patient.checkout.is_none());
        assert_eq!(patient.full_name(), "");
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(PatientStatus::parse("NEW"), Some(PatientStatus::New));
        assert_eq!(PatientStatus::parse("REGULAR"), Some(PatientStatus::Regular));
        assert_eq!(PatientStatus::parse("Постоянный"), None);
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Каримов Алишер"),
            ("Каримов".to_string(), "Алишер".to_string())
        );
        assert_eq!(
            split_full_name("Каримов Алишер Бахтиёрович"),
            ("Каримов".to_string(), "Алишер Бахтиёрович".to_string())
        );
        // Single token is allowed - last name stays empty
        assert_eq!(split_full_name("Мадонна"), ("Мадонна".to_string(), String::new()));
        assert_eq!(split_full_name("  "), (String::new(), String::new()));
    }
}
