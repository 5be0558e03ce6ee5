//! The closed set of failures that can terminate request handling

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::api::error_layer::map_failure;
use crate::api::problem::{INVALID_BODY_FORMAT, ProblemDetail, ProblemError};

/// A failure that escaped request handling.
///
/// The mapper pattern-matches on these variants instead of inspecting
/// error types at runtime.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Failure {
    /// The handler deliberately raised this exact problem; it is emitted as-is.
    #[error("{}", .0.title())]
    CarriedProblem(ProblemDetail),
    /// A failure that natively carries an HTTP status and a client-safe message.
    #[error("{status}: {message}")]
    NativeStatus { status: StatusCode, message: String },
    /// Anything else. The message is logged, never sent to the client.
    #[error("{message}")]
    Unknown { message: String },
}

impl Failure {
    #[must_use]
    pub fn problem(problem: ProblemDetail) -> Self {
        Self::CarriedProblem(problem)
    }

    #[must_use]
    pub fn native(status: StatusCode, message: impl Into<String>) -> Self {
        Self::NativeStatus {
            status,
            message: message.into(),
        }
    }

    /// Native status without a message; the problem gets no `detail`.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self::native(status, String::new())
    }

    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Status the failure carries natively, if any.
    #[must_use]
    pub fn native_status(&self) -> Option<StatusCode> {
        match self {
            Self::NativeStatus { status, .. } => Some(*status),
            Self::CarriedProblem(_) | Self::Unknown { .. } => None,
        }
    }

    /// Human-readable message text of the failure, if it has one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NativeStatus { message, .. } | Self::Unknown { message }
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            Self::CarriedProblem(problem) => problem.detail(),
            Self::NativeStatus { .. } | Self::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub fn carried_problem(&self) -> Option<&ProblemDetail> {
        match self {
            Self::CarriedProblem(problem) => Some(problem),
            Self::NativeStatus { .. } | Self::Unknown { .. } => None,
        }
    }
}

impl From<ProblemDetail> for Failure {
    fn from(problem: ProblemDetail) -> Self {
        Self::CarriedProblem(problem)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::unknown(format!("{err:#}"))
    }
}

impl From<ProblemError> for Failure {
    fn from(err: ProblemError) -> Self {
        Self::unknown(err.to_string())
    }
}

impl From<JsonRejection> for Failure {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::native(rejection.status(), rejection.body_text())
            }
            other => {
                let problem = INVALID_BODY_FORMAT
                    .as_problem(other.status().as_u16())
                    .with_detail(other.body_text());
                Self::CarriedProblem(problem)
            }
        }
    }
}

impl From<PathRejection> for Failure {
    fn from(rejection: PathRejection) -> Self {
        Self::native(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        map_failure(self)
    }
}
