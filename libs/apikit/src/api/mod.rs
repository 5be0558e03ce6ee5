//! HTTP-facing half of the error pipeline
//!
//! `failure` holds the closed set of failure shapes, `error_layer` turns them
//! into problem+json responses and installs the interception layers.

pub mod error_layer;
pub mod extract;
pub mod failure;
pub mod normalize;
pub mod param;
pub mod problem;
pub mod response;

pub use error_layer::{
    NATIVE_BODY_LIMIT, ProblemLayerExt, failure_to_problem, map_failure, panic_response,
    problem_middleware, problem_response,
};
pub use extract::ApiJson;
pub use failure::Failure;
pub use normalize::{PARAM_CONVERTER_SUFFIX, normalize_param_message};
pub use param::unresolved_param;
pub use problem::{
    APPLICATION_PROBLEM_JSON, ProblemDetail, bad_request, internal_error, not_found,
    validation_failed,
};
pub use response::{APPLICATION_JSON, api_response, created_json, ok_json};

/// Prelude module that re-exports common API types for handler authors
pub mod prelude {
    pub use crate::result::ApiResult;

    pub use super::extract::ApiJson;
    pub use super::failure::Failure;
    pub use super::param::unresolved_param;
    pub use super::problem::ProblemDetail;
    pub use super::response::{api_response, created_json, ok_json};

    pub use axum::{Json, http::StatusCode, response::IntoResponse};
}
