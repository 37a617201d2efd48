use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;

use crate::repo::{LedgerError, UserError};

/// Errors returned by the HTTP handlers
///
/// Every variant renders as `{"error": "<message>"}` with the matching
/// status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:#}", self);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::WalletNotFound
            | LedgerError::VendorWalletNotFound
            | LedgerError::OrderNotFound => ApiError::NotFound(message),
            LedgerError::OrderAlreadyCompleted => ApiError::Conflict(message),
            LedgerError::Database(e) => ApiError::Internal(e.into()),
            LedgerError::Pool(e) => ApiError::Internal(e.into()),
            _ => ApiError::Validation(message),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken => ApiError::Validation(err.to_string()),
            UserError::Other(e) => ApiError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests;
