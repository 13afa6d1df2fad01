use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::SessionError;
use crate::services::BookingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("conflict")]
    SlotConflict,

    #[error("unauthorized")]
    Unauthorized,

    #[error("authentication service unavailable")]
    UpstreamAuth,

    #[error("authentication is not configured")]
    Misconfigured,

    #[error("internal error")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(msg) => AppError::Validation(msg),
            BookingError::SlotConflict(_) => AppError::SlotConflict,
            BookingError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotConfigured => {
                tracing::error!("Session request refused: {}", e);
                AppError::Misconfigured
            }
            SessionError::Rejected => AppError::Unauthorized,
            other => {
                // Upstream detail stays in the log; clients get a generic message.
                tracing::error!("Identity service call failed: {}", other);
                AppError::UpstreamAuth
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SlotConflict => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UpstreamAuth => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Anyhow(ref e) => {
                tracing::error!("Internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match self {
            AppError::Anyhow(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
