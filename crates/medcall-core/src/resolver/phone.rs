//! Phone number normalization.
//!
//! Every write path keys patients on the canonical form produced here, so
//! normalization must be pure and deterministic. The canonical form is
//! `"+" + digits` with the digit count inside the E.164 bound of [10, 15].

use thiserror::Error;

/// Reasons a raw phone string cannot be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,

    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("invalid length: {0} digits is too short (minimum 10)")]
    TooShort(usize),

    #[error("invalid length: {0} digits is too long (maximum 15)")]
    TooLong(usize),

    #[error("phone number is not in international format")]
    NotInternational,
}

pub type PhoneResult<T> = Result<T, PhoneError>;

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// Country calling codes accepted without an explicit leading `+`.
const KNOWN_CALLING_CODES: &[&str] = &[
    "998", // Uzbekistan
    "996", // Kyrgyzstan
    "995", // Georgia
    "994", // Azerbaijan
    "993", // Turkmenistan
    "992", // Tajikistan
    "375", // Belarus
    "380", // Ukraine
    "90",  // Turkey
    "7",   // Russia / Kazakhstan
];

/// Characters treated as separators and stripped before validation.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '(' | ')' | '.' | '\'' | '"')
}

/// Normalize a raw phone string to canonical `"+" + digits` form.
///
/// The digit count is validated before any prefix interpretation, so a
/// too-short input always fails with a length reason rather than a
/// format one.
pub fn normalize_phone(raw: &str) -> PhoneResult<String> {
    let stripped: String = raw.chars().filter(|c| !is_separator(*c)).collect();
    if stripped.is_empty() {
        return Err(PhoneError::Empty);
    }

    let (has_plus, rest) = match stripped.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, stripped.as_str()),
    };

    if let Some(bad) = rest.chars().find(|c| !c.is_ascii_digit()) {
        return Err(PhoneError::InvalidCharacter(bad));
    }

    let mut digits = rest.to_string();
    match digits.len() {
        0 => return Err(PhoneError::Empty),
        n if n < MIN_DIGITS => return Err(PhoneError::TooShort(n)),
        n if n > MAX_DIGITS => return Err(PhoneError::TooLong(n)),
        _ => {}
    }

    // Local-dialing convention: a bare leading 8 is the trunk prefix for 7.
    if !has_plus && digits.starts_with('8') {
        digits.replace_range(0..1, "7");
    }

    if !has_plus
        && !KNOWN_CALLING_CODES
            .iter()
            .any(|code| digits.starts_with(code))
    {
        return Err(PhoneError::NotInternational);
    }

    Ok(format!("+{digits}"))
}
