use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::info;

use crate::db::{Credential, NewCredential};
use crate::error::VaultError;
use crate::middleware::{CredentialId, JsonBody};
use crate::router::VaultState;

/// Body returned by mutating endpoints on success.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: &'static str,
}

/// POST /api/v1/credentials
pub async fn create_credential(
    State(state): State<VaultState>,
    JsonBody(body): JsonBody<NewCredential>,
) -> Result<(StatusCode, Json<ApiMessage>), VaultError> {
    state.policy.validate(&body.username, &body.password)?;
    let id = state.storage.insert(&body).await?;
    info!(id, "credential stored");
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Credential stored successfully",
        }),
    ))
}

/// GET /api/v1/credentials
pub async fn list_credentials(
    State(state): State<VaultState>,
) -> Result<Json<Vec<Credential>>, VaultError> {
    Ok(Json(state.storage.list_all().await?))
}

/// GET /api/v1/credentials/{id}
pub async fn get_credential(
    State(state): State<VaultState>,
    CredentialId(id): CredentialId,
) -> Result<Json<Credential>, VaultError> {
    Ok(Json(state.storage.get_by_id(id).await?))
}

/// PUT /api/v1/credentials/{id}
pub async fn update_credential(
    State(state): State<VaultState>,
    CredentialId(id): CredentialId,
    JsonBody(body): JsonBody<NewCredential>,
) -> Result<Json<ApiMessage>, VaultError> {
    state.policy.validate(&body.username, &body.password)?;
    state.storage.update_by_id(id, &body).await?;
    info!(id, "credential updated");
    Ok(Json(ApiMessage {
        message: "Credential updated successfully",
    }))
}

/// DELETE /api/v1/credentials/{id}
pub async fn delete_credential(
    State(state): State<VaultState>,
    CredentialId(id): CredentialId,
) -> Result<Json<ApiMessage>, VaultError> {
    state.storage.delete_by_id(id).await?;
    info!(id, "credential deleted");
    Ok(Json(ApiMessage {
        message: "Credential deleted successfully",
    }))
}
