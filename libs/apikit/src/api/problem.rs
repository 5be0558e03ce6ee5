//! Re-exports and convenience constructors for problem types

use http::StatusCode;

pub use apikit_problem::{
    ABOUT_BLANK, APPLICATION_PROBLEM_JSON, INVALID_BODY_FORMAT, ProblemDetail, ProblemError,
    ProblemType, VALIDATION_ERROR,
};

// Convenience constructors for the statuses handlers raise most often.
// The status constants are always in range, so these cannot fail.
#[must_use]
pub fn bad_request(detail: impl Into<String>) -> ProblemDetail {
    ProblemDetail::new_or_internal(StatusCode::BAD_REQUEST.as_u16()).with_detail(detail)
}

#[must_use]
pub fn not_found(detail: impl Into<String>) -> ProblemDetail {
    ProblemDetail::new_or_internal(StatusCode::NOT_FOUND.as_u16()).with_detail(detail)
}

#[must_use]
pub fn internal_error(detail: impl Into<String>) -> ProblemDetail {
    ProblemDetail::new_or_internal(StatusCode::INTERNAL_SERVER_ERROR.as_u16()).with_detail(detail)
}

/// 400 `validation_error` problem with per-field messages under `errors`.
#[must_use]
pub fn validation_failed<K, V>(errors: impl IntoIterator<Item = (K, V)>) -> ProblemDetail
where
    K: Into<String>,
    V: Into<String>,
{
    VALIDATION_ERROR
        .as_problem(StatusCode::BAD_REQUEST.as_u16())
        .with_errors(errors)
}
