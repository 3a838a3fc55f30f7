use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid password provided")]
    InvalidPassword,

    #[error("invalid username provided")]
    InvalidUsername,

    #[error("credential not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl VaultError {
    pub fn status(&self) -> StatusCode {
        match self {
            VaultError::InvalidInput(_)
            | VaultError::InvalidPassword
            | VaultError::InvalidUsername => StatusCode::BAD_REQUEST,
            VaultError::NotFound => StatusCode::NOT_FOUND,
            VaultError::DatabaseError(_) | VaultError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed on the credential store");
            "failed to access the credential store".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Body returned for every failed request: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Renders a handler panic caught by `CatchPanicLayer` as a JSON 500.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse {
            error: "internal server error".to_string(),
        }),
    )
        .into_response()
}
