//! Error handling for the dashboard routes.
//!
//! Handlers return [`ApiResult`] and use `?`; each variant maps onto the HTTP
//! status the user sees, with a plain-text body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::refresh::RefreshError;
use crate::workbook::SheetError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Workbook missing from the data directory
    #[error("File {0} not found")]
    NotFound(String),

    /// Writing new dates failed; the workbook is unchanged
    #[error("Failed to save file: {0}")]
    Save(String),

    /// Template rendering failed
    #[error("Failed to render page: {0}")]
    Render(#[from] minijinja::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(filename: impl Into<String>) -> Self {
        ApiError::NotFound(filename.into())
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Sheet(SheetError::NotFound(filename)) => ApiError::NotFound(filename),
            RefreshError::Sheet(e) => ApiError::Save(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Save(msg) => {
                tracing::error!("Save failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Render(e) => {
                tracing::error!("Template error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// Result type alias for route handlers
pub type ApiResult<T> = Result<T, ApiError>;
