//! Bulk patient import from spreadsheet grids.
//!
//! The caller's spreadsheet reader hands over a plain grid of string cells;
//! this pipeline locates the header, walks the rows once carrying the
//! checkout-date context, collects per-row errors without aborting, and
//! batch-inserts the surviving candidates as walk-in patients.

mod header;
mod rows;

pub use header::{locate_header, HeaderMap};
pub use rows::{classify_row, parse_sheet_date, RowKind};

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::db::{self, find_patients_by_phones, insert_patient, Database};
use crate::models::{split_full_name, Patient};
use crate::resolver::{normalize_phone, BranchMatcher};

/// Grid of string cells as produced by the spreadsheet reader. Empty string
/// means a blank cell.
pub type SheetGrid = Vec<Vec<String>>;

/// One row that could not become a patient. Line numbers are 1-based as the
/// user sees them in the sheet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub reason: String,
}

/// Outcome of a successful import run.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ImportReport {
    pub total_rows: usize,
    pub header_row: Option<usize>,
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub errors: Vec<RowError>,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("sheet contains no rows")]
    EmptySheet,

    #[error("no header row found")]
    HeaderNotFound,

    #[error("import rejected: {error_count} row error(s), first at line {}: {}", first.line, first.reason)]
    Rejected { first: RowError, error_count: usize },

    #[error(transparent)]
    Db(#[from] db::DbError),
}

pub type ImportResult<T> = Result<T, ImportError>;

struct Candidate {
    phone: String,
    first_name: String,
    last_name: String,
    branch: Option<crate::models::Branch>,
    checkout: Option<NaiveDate>,
}

fn cell<'a>(row: &'a [String], col: Option<usize>) -> Option<&'a str> {
    let value = row.get(col?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Run the full import pipeline over a sheet grid.
pub fn import_grid(db: &mut Database, grid: &SheetGrid) -> ImportResult<ImportReport> {
    if grid.is_empty() {
        return Err(ImportError::EmptySheet);
    }

    let header = locate_header(grid).ok_or(ImportError::HeaderNotFound)?;
    let matcher = BranchMatcher::new();

    let mut errors: Vec<RowError> = Vec::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen: HashSet<(String, Option<NaiveDate>)> = HashSet::new();
    let mut checkout: Option<NaiveDate> = None;

    for (index, row) in grid.iter().enumerate().skip(header.row + 1) {
        let line = index + 1;

        match classify_row(row) {
            RowKind::Blank => continue,
            RowKind::DateSeparator(date) => {
                checkout = Some(date);
                continue;
            }
            RowKind::Data => {}
        }

        let name = match cell(row, header.name_col) {
            Some(name) => name,
            None => {
                errors.push(RowError {
                    line,
                    reason: "missing patient name".into(),
                });
                continue;
            }
        };
        let raw_phone = match cell(row, header.phone_col) {
            Some(phone) => phone,
            None => {
                errors.push(RowError {
                    line,
                    reason: "missing phone number".into(),
                });
                continue;
            }
        };

        let phone = match normalize_phone(raw_phone) {
            Ok(phone) => phone,
            Err(e) => {
                errors.push(RowError {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Branch is mandatory only when the header mapped a branch column.
        let branch = match header.branch_col {
            Some(_) => match cell(row, header.branch_col) {
                Some(label) => match matcher.resolve(label) {
                    Ok(branch) => Some(branch),
                    Err(e) => {
                        errors.push(RowError {
                            line,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                },
                None => {
                    errors.push(RowError {
                        line,
                        reason: "missing branch".into(),
                    });
                    continue;
                }
            },
            None => None,
        };

        // A repeated (phone, checkout) pair inside the file is dropped
        // silently, not reported.
        if !seen.insert((phone.clone(), checkout)) {
            continue;
        }

        let (first_name, last_name) = split_full_name(name);
        candidates.push(Candidate {
            phone,
            first_name,
            last_name,
            branch,
            checkout,
        });
    }

    // Against-storage dedup on the same (phone, checkout) key.
    let phones: Vec<String> = candidates.iter().map(|c| c.phone.clone()).collect();
    let existing = find_patients_by_phones(db.conn(), &phones)?;
    let existing_keys: HashSet<(String, Option<String>)> = existing
        .into_iter()
        .map(|p| (p.phone_number, p.checkout))
        .collect();

    let mut skipped_duplicates = 0;
    let to_insert: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| {
            let key = (c.phone.clone(), c.checkout.map(|d| d.to_string()));
            if existing_keys.contains(&key) {
                skipped_duplicates += 1;
                false
            } else {
                true
            }
        })
        .collect();

    let imported = {
        let tx = db.transaction()?;
        for candidate in &to_insert {
            let patient = Patient::walk_in(
                candidate.phone.clone(),
                Some(candidate.first_name.clone()),
                if candidate.last_name.is_empty() {
                    None
                } else {
                    Some(candidate.last_name.clone())
                },
                candidate.branch,
                candidate.checkout.map(|d| d.to_string()),
            );
            insert_patient(&tx, &patient)?;
        }
        tx.commit().map_err(crate::db::DbError::from)?;
        to_insert.len()
    };

    if imported == 0 {
        if let Some(first) = errors.first().cloned() {
            return Err(ImportError::Rejected {
                first,
                error_count: errors.len(),
            });
        }
    }

    info!(
        total_rows = grid.len(),
        imported,
        skipped_duplicates,
        errors = errors.len(),
        "patient import finished"
    );

    Ok(ImportReport {
        total_rows: grid.len(),
        header_row: Some(header.row),
        imported,
        skipped_duplicates,
        errors,
    })
}
