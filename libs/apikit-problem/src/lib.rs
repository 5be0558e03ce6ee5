//! Core problem-details types for apikit
//!
//! This crate provides pure data types for error responses, with no dependencies
//! on HTTP frameworks. It includes:
//! - RFC 7807 Problem Details (`ProblemDetail`)
//! - The fixed status code to title table (`status`)
//! - Catalog of application-level problem types (`ProblemType`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod error;
pub mod problem;
pub mod status;

// Re-export commonly used types
pub use catalog::{INVALID_BODY_FORMAT, ProblemType, VALIDATION_ERROR};
pub use error::ProblemError;
pub use problem::{
    ABOUT_BLANK, APPLICATION_PROBLEM_JSON, DETAIL, ERRORS, ProblemDetail, RESERVED_FIELDS,
};
pub use status::{UNKNOWN_STATUS_TITLE, title_for};
