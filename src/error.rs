//! Application error type and its HTTP rendering.
//!
//! User input problems never reach this type: they are reported as field
//! errors on a view or as a `400` with the validator message. Everything here
//! is a fault the caller cannot fix by resubmitting.

use crate::factories::FactoryError;
use crate::identity::IdentityStoreError;
use crate::repos::museum_repo::RepoError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unable to load user with ID '{0}'.")]
    UserNotFound(Uuid),

    #[error("{0}")]
    Unexpected(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Identity(#[from] IdentityStoreError),

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Factory(_) => StatusCode::BAD_REQUEST,
            AppError::Repo(RepoError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Repo(RepoError::TenantMismatch { .. }) => StatusCode::CONFLICT,
            AppError::UserNotFound(_)
            | AppError::Unexpected(_)
            | AppError::Repo(_)
            | AppError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::Unexpected(_) => "UNEXPECTED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Repo(RepoError::NotFound { .. }) => "NOT_FOUND",
            AppError::Repo(RepoError::TenantMismatch { .. }) => "TENANT_MISMATCH",
            AppError::Repo(_) => "DATABASE_ERROR",
            AppError::Identity(_) => "IDENTITY_ERROR",
            AppError::Factory(_) => "INVALID_REFERENCE",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(err = %self, "Request failed");
        }
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}
