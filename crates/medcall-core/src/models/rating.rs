//! Satisfaction rating models.

use serde::{Deserialize, Serialize};

use super::Branch;

/// The five fixed rating categories. A bulk submission always produces
/// exactly one rating per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    Doctors,
    Nurses,
    Cleaning,
    Kitchen,
    Reception,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 5] = [
        RatingCategory::Doctors,
        RatingCategory::Nurses,
        RatingCategory::Cleaning,
        RatingCategory::Kitchen,
        RatingCategory::Reception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingCategory::Doctors => "DOCTORS",
            RatingCategory::Nurses => "NURSES",
            RatingCategory::Cleaning => "CLEANING",
            RatingCategory::Kitchen => "KITCHEN",
            RatingCategory::Reception => "RECEPTION",
        }
    }

    pub fn parse(s: &str) -> Option<RatingCategory> {
        RatingCategory::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// A satisfaction score. Scores below 2 are not part of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Score {
    Two,
    Three,
    Four,
    Five,
}

impl Score {
    /// Default score used when a bulk submission omits a category.
    pub const MAX: Score = Score::Five;

    pub const ALL: [Score; 4] = [Score::Two, Score::Three, Score::Four, Score::Five];

    pub fn value(&self) -> i64 {
        match self {
            Score::Two => 2,
            Score::Three => 3,
            Score::Four => 4,
            Score::Five => 5,
        }
    }

    pub fn from_value(v: i64) -> Option<Score> {
        match v {
            2 => Some(Score::Two),
            3 => Some(Score::Three),
            4 => Some(Score::Four),
            5 => Some(Score::Five),
            _ => None,
        }
    }
}

/// One satisfaction score for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: String,
    pub category: RatingCategory,
    pub score: Score,
    pub branch: Branch,
    pub operator_id: String,
    pub patient_id: Option<String>,
    /// One-to-one link to a complaint, when the rating triggered one.
    pub feedback_id: Option<String>,
    pub created_at: String,
}

impl Rating {
    pub fn new(
        category: RatingCategory,
        score: Score,
        branch: Branch,
        operator_id: String,
        patient_id: Option<String>,
        feedback_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            score,
            branch,
            operator_id,
            patient_id,
            feedback_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
