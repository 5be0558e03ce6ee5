//! Ergonomic result types for API handlers

use crate::api::failure::Failure;

/// Standard result type for API handlers
///
/// ```ignore
/// async fn handler(Path(nickname): Path<String>) -> ApiResult<Response> {
///     let programmer = find(&nickname).ok_or_else(unresolved_param::<Programmer>)?;
///     Ok(ok_json(&programmer))
/// }
/// ```
///
/// The `?` operator converts anything implementing `Into<Failure>` (a
/// `ProblemDetail`, `anyhow::Error`, axum JSON/path rejections). `Failure`
/// implements `IntoResponse`, so the error side always renders as problem+json.
pub type ApiResult<T = ()> = Result<T, Failure>;
