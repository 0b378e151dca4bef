// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the intake service

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure the intake service and its client can produce.
/// Per-image variants are logged and swallowed by the media service; all other
/// variants surface to the handler and become a failure envelope.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("No data received")]
    NoDataReceived,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Required columns not found in sheet")]
    ColumnsNotFound,

    #[error("Image persistence failed: {0}")]
    ImagePersistence(String),

    #[error("Base64 decode failed: {0}")]
    Decode(String),

    #[error("Store operation failed: {0}")]
    StoreOperation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            BookingError::NoDataReceived => "NO_DATA_RECEIVED",
            BookingError::InvalidPayload(_) => "INVALID_PAYLOAD",
            BookingError::ColumnsNotFound => "COLUMNS_NOT_FOUND",
            BookingError::ImagePersistence(_) => "IMAGE_PERSISTENCE_FAILURE",
            BookingError::Decode(_) => "DECODE_FAILURE",
            BookingError::StoreOperation(_) => "STORE_OPERATION_FAILURE",
            BookingError::Validation(_) => "VALIDATION_ERROR",
            BookingError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            BookingError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(e: sqlx::Error) -> Self {
        BookingError::StoreOperation(e.to_string())
    }
}

impl From<std::io::Error> for BookingError {
    fn from(e: std::io::Error) -> Self {
        BookingError::StoreOperation(e.to_string())
    }
}

/// Convert BookingError to HTTP response
/// DOCUMENTATION: The transport always answers 200; the outcome lives in the body
/// as `{ success: false, error, code, timestamp }`.
impl ResponseError for BookingError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "code": self.error_code(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }
}
