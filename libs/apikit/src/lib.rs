//! apikit: a uniform problem+json error pipeline for axum services
//!
//! Every failure that escapes request handling ends up as an RFC 7807 problem
//! response. Handlers return [`ApiResult`]; framework rejections, bare error
//! statuses and panics are caught by the layers installed with
//! [`api::ProblemLayerExt::with_problem_pipeline`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod result;

pub use api::{
    ApiJson, Failure, ProblemDetail, ProblemLayerExt, failure_to_problem, map_failure,
    problem_middleware, problem_response,
};
pub use result::ApiResult;
