//! Per-branch summary over a date range.
//!
//! One row per branch: patient intake, call outcomes with answered and
//! unanswered percentages, and rating counts by category and by score.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};
use crate::models::{Branch, CallOutcome, RatingCategory, Score};

/// Aggregated figures for one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchSummary {
    pub branch: String,
    pub patients: i64,
    pub total_calls: i64,
    pub answered_calls: i64,
    pub unanswered_calls: i64,
    pub percent_answered: f64,
    pub percent_unanswered: f64,
    /// Counts per call outcome, in the fixed outcome order.
    pub calls_by_outcome: Vec<(String, i64)>,
    /// Rating counts per category, in the fixed category order.
    pub ratings_by_category: Vec<(String, i64)>,
    /// Rating counts per score (2 through 5).
    pub ratings_by_score: Vec<(i64, i64)>,
    /// Share of each score among all ratings, same order.
    pub percent_by_score: Vec<(i64, f64)>,
}

/// Full report for a date range (both ends inclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub generated_at: String,
    pub branches: Vec<BranchSummary>,
}

/// Builds summary reports from the database.
pub struct SummaryExporter<'a> {
    db: &'a Database,
}

fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64 * 10000.0).round() / 100.0
    }
}

impl<'a> SummaryExporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Aggregate every branch over `[from, to]`.
    pub fn generate(&self, from: NaiveDate, to: NaiveDate) -> DbResult<SummaryReport> {
        // Timestamps are rfc3339-sortable strings, so an exclusive upper
        // bound at the next midnight covers the whole `to` day.
        let range_from = from.to_string();
        let range_to = to
            .checked_add_days(Days::new(1))
            .unwrap_or(to)
            .to_string();

        let mut branches = Vec::with_capacity(Branch::ALL.len());
        for &branch in &Branch::ALL {
            branches.push(self.branch_summary(branch, &range_from, &range_to)?);
        }

        Ok(SummaryReport {
            from,
            to,
            generated_at: chrono::Utc::now().to_rfc3339(),
            branches,
        })
    }

    fn branch_summary(
        &self,
        branch: Branch,
        from: &str,
        to_exclusive: &str,
    ) -> DbResult<BranchSummary> {
        let patients = self.db.count_patients_in_range(branch, from, to_exclusive)?;
        let total_calls = self
            .db
            .count_calls_in_range(branch, None, from, to_exclusive)?;
        let answered_calls = self.db.count_calls_in_range(
            branch,
            Some(CallOutcome::Answered),
            from,
            to_exclusive,
        )?;
        let unanswered_calls = total_calls - answered_calls;

        let mut calls_by_outcome = Vec::with_capacity(CallOutcome::ALL.len());
        for &outcome in &CallOutcome::ALL {
            let count =
                self.db
                    .count_calls_in_range(branch, Some(outcome), from, to_exclusive)?;
            calls_by_outcome.push((outcome.as_str().to_string(), count));
        }

        let ratings = self.db.list_ratings_in_range(branch, from, to_exclusive)?;
        let total_ratings = ratings.len() as i64;

        let ratings_by_category = RatingCategory::ALL
            .iter()
            .map(|&category| {
                let count = ratings.iter().filter(|r| r.category == category).count();
                (category.as_str().to_string(), count as i64)
            })
            .collect();

        let mut ratings_by_score = Vec::new();
        let mut percent_by_score = Vec::new();
        for &score in &[Score::Two, Score::Three, Score::Four, Score::Five] {
            let count = ratings.iter().filter(|r| r.score == score).count() as i64;
            ratings_by_score.push((score.value(), count));
            percent_by_score.push((score.value(), percent(count, total_ratings)));
        }

        Ok(BranchSummary {
            branch: branch.as_str().to_string(),
            patients,
            total_calls,
            answered_calls,
            unanswered_calls,
            percent_answered: percent(answered_calls, total_calls),
            percent_unanswered: percent(unanswered_calls, total_calls),
            calls_by_outcome,
            ratings_by_category,
            ratings_by_score,
            percent_by_score,
        })
    }
}

impl SummaryReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one line per branch.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("branch,patients,total_calls,answered,unanswered,percent_answered,percent_unanswered");
        for outcome in &CallOutcome::ALL {
            csv.push_str(&format!(",{}", outcome.as_str().to_lowercase()));
        }
        for category in &RatingCategory::ALL {
            csv.push_str(&format!(",ratings_{}", category.as_str().to_lowercase()));
        }
        for value in 2..=5 {
            csv.push_str(&format!(",score_{value}"));
        }
        for value in 2..=5 {
            csv.push_str(&format!(",percent_score_{value}"));
        }
        csv.push('\n');

        for summary in &self.branches {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}",
                escape_csv(&summary.branch),
                summary.patients,
                summary.total_calls,
                summary.answered_calls,
                summary.unanswered_calls,
                summary.percent_answered,
                summary.percent_unanswered,
            ));
            for (_, count) in &summary.calls_by_outcome {
                csv.push_str(&format!(",{count}"));
            }
            for (_, count) in &summary.ratings_by_category {
                csv.push_str(&format!(",{count}"));
            }
            for (_, count) in &summary.ratings_by_score {
                csv.push_str(&format!(",{count}"));
            }
            for (_, share) in &summary.percent_by_score {
                csv.push_str(&format!(",{share}"));
            }
            csv.push('\n');
        }

        csv
    }
}

/// Escape CSV field if needed.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
