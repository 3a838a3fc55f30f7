use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::VaultError;

/// `{id}` path segment parsed as an integer credential id.
#[derive(Debug, Clone, Copy)]
pub struct CredentialId(pub i64);

impl<S> FromRequestParts<S> for CredentialId
where
    S: Send + Sync,
{
    type Rejection = VaultError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| VaultError::InvalidInput("invalid credential ID".to_string()))?;
        raw.trim()
            .parse::<i64>()
            .map(CredentialId)
            .map_err(|_| VaultError::InvalidInput(format!("invalid credential ID: {raw}")))
    }
}

/// JSON body whose rejections render as `{"error": ...}` with status 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = VaultError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(VaultError::InvalidInput(format!(
                "invalid request body: {}",
                rejection.body_text()
            ))),
        }
    }
}
