use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::error_layer::map_failure;
use crate::api::failure::Failure;

/// Content type of regular API responses.
pub const APPLICATION_JSON: &str = "application/json";

/// Serialize `data` as a JSON response with the given status.
///
/// `None` fields are emitted as `null`. A value that cannot be serialized
/// becomes an unknown failure, i.e. a 500 problem.
#[must_use]
pub fn api_response<T: Serialize + ?Sized>(data: &T, status: StatusCode) -> Response {
    match serde_json::to_vec(data) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
            body,
        )
            .into_response(),
        Err(err) => map_failure(Failure::unknown(format!(
            "failed to serialize response body: {err}"
        ))),
    }
}

/// 200 OK + JSON
#[must_use]
pub fn ok_json<T: Serialize + ?Sized>(data: &T) -> Response {
    api_response(data, StatusCode::OK)
}

/// 201 Created + JSON with Location header
#[must_use]
pub fn created_json<T: Serialize + ?Sized>(data: &T, location: &str) -> Response {
    let mut response = api_response(data, StatusCode::CREATED);
    if response.status() == StatusCode::CREATED {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                response.headers_mut().insert(header::LOCATION, value);
            }
            Err(err) => tracing::warn!(error = %err, location, "Invalid Location header"),
        }
    }
    response
}
