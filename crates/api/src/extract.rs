//! Request extractors.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then validated with `validator`.
///
/// Malformed bodies reject with `INVALID_BODY`; rule violations reject with
/// `VALIDATION_ERROR` and per-field messages. Both are 422.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateCategory>) -> AppResult<...> {
///     // `input` already passed its rules here.
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
