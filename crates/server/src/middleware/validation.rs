//! JSON body extractor that runs `validator` rules.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, FieldErrors};

/// Like [`Json`], but validates the body and rejects with a 400 field map.
///
/// A body that isn't valid JSON for `T` is reported under the `body` key.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ValidatedJson(req): ValidatedJson<CartRequest>) -> impl IntoResponse {
///     // req passed validation
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let mut fields = FieldErrors::new();
                fields.insert("body".to_string(), rejection.body_text());
                AppError::Validation(fields)
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}
