//! Classification of sheet rows below the header.

use chrono::NaiveDate;

/// Spreadsheet day-count epoch (the 1900 system with its leap-year quirk
/// folded in).
const SHEET_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Plausible serial day-count window, roughly 1954..2064. Anything outside
/// is treated as a plain number, not a date.
const SERIAL_RANGE: std::ops::RangeInclusive<i64> = 20_000..=60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Every cell empty. Skipped without side effect.
    Blank,
    /// A single date cell. Updates the carried checkout context.
    DateSeparator(NaiveDate),
    /// Anything else. Parsed as a patient candidate.
    Data,
}

/// Classify one row below the header.
pub fn classify_row(row: &[String]) -> RowKind {
    let mut non_empty = row.iter().filter(|cell| !cell.trim().is_empty());

    let first = match non_empty.next() {
        Some(cell) => cell,
        None => return RowKind::Blank,
    };
    if non_empty.next().is_some() {
        return RowKind::Data;
    }

    match parse_sheet_date(first) {
        Some(date) => RowKind::DateSeparator(date),
        None => RowKind::Data,
    }
}

/// Parse a cell as a calendar date: `d.m.y`, `d/m/y` or `d-m-y` with a 2- or
/// 4-digit year, or a raw spreadsheet serial day count.
pub fn parse_sheet_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    for sep in ['.', '/', '-'] {
        let parts: Vec<&str> = trimmed.split(sep).collect();
        if parts.len() != 3 {
            continue;
        }
        let day: u32 = parts[0].trim().parse().ok()?;
        let month: u32 = parts[1].trim().parse().ok()?;
        let year_part = parts[2].trim();
        let mut year: i32 = year_part.parse().ok()?;
        if year_part.len() == 2 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let serial: i64 = trimmed.parse().ok()?;
    if !SERIAL_RANGE.contains(&serial) {
        return None;
    }
    let (y, m, d) = SHEET_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_days(chrono::Days::new(serial as u64))
}
