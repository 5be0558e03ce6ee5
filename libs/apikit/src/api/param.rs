//! Failures for path parameters that do not resolve to an entity

use http::StatusCode;

use crate::api::failure::Failure;
use crate::api::normalize::PARAM_CONVERTER_SUFFIX;

/// 404 failure for a request parameter that could not be resolved into a `T`.
///
/// The message uses the parameter-resolution wording, so the mapper reports it
/// as `"No {type} found"`, e.g. `"No programmer found"` for `Programmer`.
#[must_use]
pub fn unresolved_param<T: ?Sized>() -> Failure {
    let type_name = std::any::type_name::<T>();
    Failure::native(
        StatusCode::NOT_FOUND,
        format!("{type_name} {PARAM_CONVERTER_SUFFIX}."),
    )
}
