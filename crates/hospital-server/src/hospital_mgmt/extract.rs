//! JSON body extraction with the service's error body.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use hospital_api::ApiError;
use serde::de::DeserializeOwned;

/// Like [`axum::Json`], but ignores `Content-Type` and answers malformed
/// bodies with a `400 Invalid request body` error.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| {
                ApiError::bad_request("Invalid request body", e.to_string()).into_response()
            })
    }
}
