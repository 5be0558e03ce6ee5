/// Errors raised while building a [`ProblemDetail`](crate::ProblemDetail).
#[derive(thiserror::Error, Debug)]
pub enum ProblemError {
    #[error("status code {0} is outside the HTTP range 100-599")]
    InvalidStatus(u16),
    #[error("problem title must not be empty")]
    EmptyTitle,
    #[error("extension key '{0}' collides with a reserved problem field")]
    ReservedField(String),
    #[error("extension '{key}' could not be serialized: {source}")]
    Extension {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
