//! Complaint (feedback) models.

use serde::{Deserialize, Serialize};

/// Workflow status a freshly created complaint starts in. Free text that
/// mirrors the external board's intake column name; subsequent statuses come
/// back from the board via its webhook collaborator.
pub const DEFAULT_WORKFLOW_STATUS: &str = "Поступившие жалобы";

/// Kind of a recorded grievance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackCategory {
    Complaint,
    Suggestion,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Complaint => "COMPLAINT",
            FeedbackCategory::Suggestion => "SUGGESTION",
        }
    }

    pub fn parse(s: &str) -> Option<FeedbackCategory> {
        match s {
            "COMPLAINT" => Some(FeedbackCategory::Complaint),
            "SUGGESTION" => Some(FeedbackCategory::Suggestion),
            _ => None,
        }
    }
}

/// A recorded grievance or suggestion, optionally carrying messages claimed
/// from the inbound pool at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub category: FeedbackCategory,
    /// Free-text workflow status, mirrors the external board column.
    pub status: String,
    pub phone_number: String,
    pub operator_id: String,
    pub patient_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Feedback {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        category: FeedbackCategory,
        phone_number: String,
        operator_id: String,
        patient_id: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name,
            last_name,
            category,
            status: DEFAULT_WORKFLOW_STATUS.to_string(),
            phone_number,
            operator_id,
            patient_id,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Patient display name for card rendering.
    pub fn display_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim().to_string();
        if name.is_empty() {
            "Не указано".to_string()
        } else {
            name
        }
    }
}
