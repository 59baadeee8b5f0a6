//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Invalid or expired credential
    #[error("Forbidden")]
    Forbidden,

    /// Point lookup found nothing
    #[error("Not found")]
    NotFound,

    /// Input failed validation before any store call
    #[error("Bad request: {0}")]
    Validation(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal,

    /// Document store error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Payment gateway call failed
    #[error("Payment gateway error: {0}")]
    PaymentGateway(#[from] crate::payments::PaymentsError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden access".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::PaymentGateway(e) => {
                error!("Payment gateway error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Payment gateway error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
