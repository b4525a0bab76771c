//! Fuzzy matching of free-text branch labels to the canonical branch set.

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

use crate::models::Branch;

/// Minimum combined similarity to accept a match.
pub const MATCH_THRESHOLD: f64 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BranchMatchError {
    #[error("unrecognized branch '{input}', did you mean: {}?", suggestions.join(", "))]
    NoMatch {
        input: String,
        suggestions: Vec<String>,
    },
}

pub type BranchMatchResult<T> = Result<T, BranchMatchError>;

/// Matches free-text labels against the canonical branch names.
pub struct BranchMatcher {
    threshold: f64,
}

impl Default for BranchMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchMatcher {
    pub fn new() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Resolve a free-text label to a canonical branch, or fail with the
    /// nearest candidates. Never returns a below-threshold guess.
    pub fn resolve(&self, input: &str) -> BranchMatchResult<Branch> {
        let query = input.trim().to_uppercase();

        let mut scored: Vec<(Branch, f64)> = Branch::ALL
            .iter()
            .map(|&branch| (branch, fuzzy_match(&query, branch.as_str())))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        match scored.first() {
            Some(&(branch, score)) if score >= self.threshold => Ok(branch),
            _ => Err(BranchMatchError::NoMatch {
                input: input.to_string(),
                suggestions: scored
                    .iter()
                    .take(3)
                    .map(|(branch, _)| branch.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes, Levenshtein overall shape
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}
