// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;
use tracing::error;

use aquaflow_pipeline::TransitionError;
use aquaflow_storage::StorageError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Machine-readable error payload
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: &'static str, message: String) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorBody { code, message }),
        }
    }
}

/// Request failures, mapped onto HTTP status classes
#[derive(Debug)]
pub enum ApiError {
    /// 401: no identity could be resolved for the request
    Unauthorized(String),
    /// 403: the validator denied the action
    Forbidden(String),
    /// 404: referenced record does not exist
    NotFound(String),
    /// 500: persistence or other internal failure
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, "permission_denied", m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", m),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = self.parts();
        (
            status,
            ResponseJson(ApiResponse::error(code, message.to_string())),
        )
            .into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound("record not found".to_string()),
            other => {
                error!("Storage error: {}", other);
                ApiError::Internal("database error".to_string())
            }
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound => ApiError::NotFound("customer not found".to_string()),
            TransitionError::Denied(reason) => ApiError::Forbidden(reason.to_string()),
            TransitionError::Storage(e) => {
                error!("Storage error during transition: {}", e);
                ApiError::Internal("database error".to_string())
            }
        }
    }
}
