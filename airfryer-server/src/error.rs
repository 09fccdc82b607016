//! Error types for airfryer-server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// airfryer-common error
    #[error(transparent)]
    Common(#[from] airfryer_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use airfryer_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Common(ref err) => {
                let status = match err {
                    CommonError::InvalidAddress(_) => StatusCode::NOT_FOUND,
                    CommonError::InvalidInput(_)
                    | CommonError::ImportFormat(_)
                    | CommonError::ImportParse(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code(), err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
