//! Catalog of application-level problem types

use crate::problem::ProblemDetail;
use crate::status::checked_status;
use http::StatusCode;

/// Static problem type definition: a stable type identifier and its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemType {
    pub type_url: &'static str,
    pub title: &'static str,
}

/// Request data failed validation.
pub const VALIDATION_ERROR: ProblemType = ProblemType {
    type_url: "validation_error",
    title: "There was a validation error",
};

/// Request body could not be decoded as JSON.
pub const INVALID_BODY_FORMAT: ProblemType = ProblemType {
    type_url: "invalid_body_format",
    title: "Invalid JSON format sent",
};

impl ProblemType {
    /// Convert this definition into a problem with the given status.
    #[inline]
    #[must_use]
    pub fn as_problem(&self, status: u16) -> ProblemDetail {
        // Out-of-range codes fall back to INTERNAL_SERVER_ERROR
        let status = checked_status(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ProblemDetail::of_type(status, self)
    }
}
