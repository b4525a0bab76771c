//! Operator (acting staff) model.

use serde::{Deserialize, Serialize};

/// A staff member allowed to log calls, ratings, and complaints. Every write
/// coordinator validates the operator exists before persisting anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operator {
    pub id: String,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

impl Operator {
    pub fn new(name: String, role: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
