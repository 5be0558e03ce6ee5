//! Centralized error mapping for Axum
//!
//! Every failure that escapes request handling is converted here into an
//! RFC 7807 problem+json response. Three routes lead into the mapper:
//! - handlers returning `Err(Failure)` (`Failure: IntoResponse`)
//! - [`problem_middleware`], which rewrites error responses produced by the
//!   framework itself (unmatched routes, extractor rejections, bare status codes)
//! - [`panic_response`], the handler for `CatchPanicLayer`
//!
//! [`problem_response`] is the only place that sets the problem content type.

use std::any::Any;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::failure::Failure;
use crate::api::normalize::normalize_param_message;
use crate::api::problem::{APPLICATION_PROBLEM_JSON, ProblemDetail};

/// Upper bound on how much of a framework error body is read to recover its message.
pub const NATIVE_BODY_LIMIT: usize = 64 * 1024;

/// Body used if a problem mapping ever fails to serialize.
const FALLBACK_PROBLEM_BODY: &str =
    r#"{"status":500,"title":"Internal Server Error","type":"about:blank"}"#;

/// Decide which problem describes a failure.
///
/// A carried problem is used as-is. Otherwise the status is the native one,
/// or 500, and a native message becomes the `detail` extension.
#[must_use]
pub fn failure_to_problem(failure: Failure) -> ProblemDetail {
    match failure {
        Failure::CarriedProblem(problem) => problem,
        Failure::NativeStatus { status, message } => {
            let problem = ProblemDetail::new_or_internal(status.as_u16());
            if problem.status() != status {
                tracing::warn!(
                    status = status.as_u16(),
                    "Native status outside the HTTP range, mapped to 500"
                );
            }
            if message.is_empty() {
                problem
            } else {
                problem.with_detail(normalize_param_message(&message))
            }
        }
        Failure::Unknown { message } => {
            tracing::error!(error = %message, "Unhandled failure during request processing");
            ProblemDetail::new_or_internal(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
        }
    }
}

/// Render a problem: JSON body, matching status, `application/problem+json`.
#[must_use]
pub fn problem_response(problem: &ProblemDetail) -> Response {
    let status = problem.status();
    match serde_json::to_vec(&problem.to_mapping()) {
        Ok(body) => render(status, Body::from(body)),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize problem body");
            render(
                StatusCode::INTERNAL_SERVER_ERROR,
                Body::from(FALLBACK_PROBLEM_BODY),
            )
        }
    }
}

fn render(status: StatusCode, body: Body) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        )],
        body,
    )
        .into_response()
}

/// Map a failure all the way to its response.
#[must_use]
pub fn map_failure(failure: Failure) -> Response {
    let problem = failure_to_problem(failure);
    tracing::debug!(
        status = problem.status().as_u16(),
        title = problem.title(),
        "Responding with problem"
    );
    problem_response(&problem)
}

/// Outermost middleware that rewrites any remaining error response into a problem.
///
/// Successful responses and JSON bodies (including problem+json) pass through.
/// Other 4xx/5xx responses become a native-status failure whose message is
/// the original body text. Headers other than content type and length survive.
pub async fn problem_middleware(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if !needs_problem_body(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match axum::body::to_bytes(body, NATIVE_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_owned(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read error response body");
            String::new()
        }
    };

    let mut mapped = map_failure(Failure::native(parts.status, message));
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            mapped.headers_mut().append(name.clone(), value.clone());
        }
    }
    mapped
}

/// Check whether an error response still needs to be rewritten
fn needs_problem_body(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error()) && !is_json_response(response)
}

/// JSON and `+json` bodies were produced deliberately and are left alone
fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .is_some_and(|essence| essence == "application/json" || essence.ends_with("+json"))
}

/// `CatchPanicLayer` handler: a panic is an unknown failure.
#[allow(clippy::needless_pass_by_value)] // CatchPanicLayer hands over the payload by value
#[must_use]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "non-string panic payload".to_owned()
    };
    map_failure(Failure::unknown(format!("handler panicked: {message}")))
}

/// Installs the problem pipeline on a router.
pub trait ProblemLayerExt {
    /// Wrap the router with panic interception and, outermost, [`problem_middleware`].
    ///
    /// Call this last so the middleware sees responses from every other layer.
    #[must_use]
    fn with_problem_pipeline(self) -> Self;
}

impl<S> ProblemLayerExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_problem_pipeline(self) -> Self {
        self.layer(CatchPanicLayer::custom(panic_response))
            .layer(axum::middleware::from_fn(problem_middleware))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::api::problem::{ABOUT_BLANK, VALIDATION_ERROR};
    use axum::{Json, routing::get};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&body).expect("Failed to parse problem JSON")
    }

    fn content_type(response: &Response) -> &str {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    #[test]
    fn carried_problem_is_used_verbatim() {
        let carried = ProblemDetail::typed(422, &VALIDATION_ERROR)
            .unwrap()
            .with_errors([("email", "Email is required")])
            .with_type("https://errors.example.com/validation");
        let problem = failure_to_problem(Failure::problem(carried.clone()));
        assert_eq!(problem, carried);
        assert_eq!(problem.to_mapping(), carried.to_mapping());
    }

    #[test]
    fn native_status_is_kept() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::FORBIDDEN,
            StatusCode::CONFLICT,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let problem = failure_to_problem(Failure::status(status));
            assert_eq!(problem.status(), status);
            assert_eq!(problem.title(), status.canonical_reason().unwrap());
            assert_eq!(problem.detail(), None);
        }
    }

    #[test]
    fn native_status_outside_range_is_clamped() {
        let status = StatusCode::from_u16(799).unwrap();
        let problem = failure_to_problem(Failure::native(status, "odd"));
        assert_eq!(problem.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.detail(), Some("odd"));
    }

    #[test]
    fn native_message_becomes_detail() {
        let problem = failure_to_problem(Failure::native(
            StatusCode::METHOD_NOT_ALLOWED,
            "Only GET is supported",
        ));
        assert_eq!(problem.detail(), Some("Only GET is supported"));
    }

    #[test]
    fn param_converter_message_is_normalized() {
        let problem = failure_to_problem(Failure::native(
            StatusCode::NOT_FOUND,
            "Foo bar object not found by the @ParamConverter annotation",
        ));
        assert_eq!(problem.detail(), Some("No bar found"));
    }

    #[test]
    #[traced_test]
    fn unknown_failure_is_internal_and_hides_message() {
        let problem = failure_to_problem(Failure::unknown("password=hunter2 leaked"));
        assert_eq!(problem.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.title(), "Internal Server Error");
        assert_eq!(problem.detail(), None);
        assert!(logs_contain("Unhandled failure during request processing"));
    }

    #[test]
    fn anyhow_error_maps_to_internal_problem() {
        let problem = failure_to_problem(anyhow::anyhow!("Something went wrong").into());
        assert_eq!(problem.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.type_url(), ABOUT_BLANK);
    }

    #[tokio::test]
    async fn failure_response_has_problem_content_type() {
        let response = Failure::status(StatusCode::NOT_FOUND).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        assert_eq!(
            body_json(response).await,
            json!({"status": 404, "title": "Not Found", "type": "about:blank"})
        );
    }

    async fn panicking_handler() -> &'static str {
        panic!("index out of bounds")
    }

    fn test_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { Json(json!({"ok": true})) }))
            .route(
                "/json-error",
                get(|| async { (StatusCode::CONFLICT, Json(json!({"reason": "taken"}))) }),
            )
            .route(
                "/plain-error",
                get(|| async { (StatusCode::BAD_REQUEST, "Invalid nickname") }),
            )
            .route(
                "/retry",
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        [(header::RETRY_AFTER, "30")],
                    )
                }),
            )
            .route(
                "/huge-error",
                get(|| async { (StatusCode::BAD_REQUEST, "x".repeat(NATIVE_BODY_LIMIT + 4_464)) }),
            )
            .route("/panic", get(panicking_handler))
            .with_problem_pipeline()
    }

    async fn call(router: Router, method: &str, uri: &str) -> Response {
        router
            .oneshot(
                http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn middleware_passes_success_through() {
        let response = call(test_router(), "GET", "/ok").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "application/json");
    }

    #[tokio::test]
    async fn middleware_leaves_json_errors_alone() {
        let response = call(test_router(), "GET", "/json-error").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(content_type(&response), "application/json");
        assert_eq!(body_json(response).await, json!({"reason": "taken"}));
    }

    #[tokio::test]
    async fn middleware_rewrites_plain_error() {
        let response = call(test_router(), "GET", "/plain-error").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        assert_eq!(
            body_json(response).await,
            json!({
                "status": 400,
                "title": "Bad Request",
                "type": "about:blank",
                "detail": "Invalid nickname"
            })
        );
    }

    #[tokio::test]
    async fn unmatched_route_becomes_not_found_problem() {
        let response = call(test_router(), "GET", "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        assert_eq!(
            body_json(response).await,
            json!({"status": 404, "title": "Not Found", "type": "about:blank"})
        );
    }

    #[tokio::test]
    async fn method_not_allowed_keeps_allow_header() {
        let response = call(test_router(), "DELETE", "/ok").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        assert!(response.headers().contains_key(header::ALLOW));
    }

    #[tokio::test]
    async fn retry_after_survives_rewrite() {
        let response = call(test_router(), "GET", "/retry").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok()),
            Some("30")
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn oversized_error_body_drops_detail() {
        let response = call(test_router(), "GET", "/huge-error").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        assert_eq!(
            body_json(response).await,
            json!({"status": 400, "title": "Bad Request", "type": "about:blank"})
        );
        assert!(logs_contain("Failed to read error response body"));
    }

    #[tokio::test]
    async fn error_body_at_limit_keeps_detail() {
        let router = Router::new()
            .route(
                "/limit",
                get(|| async { (StatusCode::BAD_REQUEST, "y".repeat(NATIVE_BODY_LIMIT)) }),
            )
            .with_problem_pipeline();
        let response = call(router, "GET", "/limit").await;
        let body = body_json(response).await;
        assert_eq!(
            body["detail"].as_str().map(str::len),
            Some(NATIVE_BODY_LIMIT)
        );
    }

    #[tokio::test]
    async fn panic_becomes_internal_problem() {
        let response = call(test_router(), "GET", "/panic").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type(&response), APPLICATION_PROBLEM_JSON);
        let body = body_json(response).await;
        assert_eq!(body["title"], json!("Internal Server Error"));
        assert!(body.get("detail").is_none());
    }
}
