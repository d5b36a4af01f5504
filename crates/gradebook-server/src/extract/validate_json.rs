//! JSON extraction with automatic validation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::handler::{Error, ErrorKind};

/// JSON extractor that runs `validator` checks after deserialization.
///
/// Rejections are interface-level errors (HTTP 400), not outcome envelopes:
/// a request that cannot be parsed never reaches the guard or the
/// persistence layer.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ErrorKind::BadRequest.with_context(rejection.to_string())
            })?;

        value
            .validate()
            .map_err(|errors| ErrorKind::BadRequest.with_context(errors.to_string()))?;

        Ok(Self(value))
    }
}
