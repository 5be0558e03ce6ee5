//! Status code validation and the status code to title table

use http::StatusCode;

use crate::error::ProblemError;

/// Title used for status codes without a canonical reason phrase.
pub const UNKNOWN_STATUS_TITLE: &str = "Unknown Status Code";

/// Lowest status code a problem may carry.
pub const MIN_STATUS: u16 = 100;
/// Highest status code a problem may carry.
pub const MAX_STATUS: u16 = 599;

/// Human-readable title for a status code.
///
/// Uses the canonical reason phrase of the `http` crate's table, which is static
/// and never mutated.
#[must_use]
pub fn title_for(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or(UNKNOWN_STATUS_TITLE)
}

/// Validate a raw status code against the range problems accept.
///
/// `http::StatusCode` itself admits codes up to 999, so the upper bound is
/// checked explicitly.
///
/// # Errors
/// Returns `ProblemError::InvalidStatus` for codes outside 100-599.
pub fn checked_status(code: u16) -> Result<StatusCode, ProblemError> {
    if !(MIN_STATUS..=MAX_STATUS).contains(&code) {
        return Err(ProblemError::InvalidStatus(code));
    }
    StatusCode::from_u16(code).map_err(|_| ProblemError::InvalidStatus(code))
}
