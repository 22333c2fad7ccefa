//! JSON body extractor with localized rejections.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::debug;

use tekniker_core::error::AppError;
use tekniker_core::messages;

/// Like [`axum::Json`], but malformed or missing bodies become a 400
/// [`AppError`] in the standard error shape.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    debug!(reason = %rejection.body_text(), "Rejected JSON body");
    AppError::validation(messages::INVALID_PAYLOAD)
        .with_details(serde_json::Value::String(rejection.body_text()))
}
