//! Request extractors whose rejections are already failures

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::api::failure::Failure;

/// JSON body extractor for handlers.
///
/// Behaves like [`axum::Json`], but a rejected body is turned into a
/// [`Failure`] on the spot: malformed or mistyped JSON becomes the
/// `invalid_body_format` problem, a missing JSON content type stays a 415.
#[derive(Debug, Clone)]
#[must_use]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
