//! Unified error handling for Atelier Booking
//!
//! This module provides the error taxonomy for the reservation workflow,
//! with automatic HTTP response mapping.
//!
//! The taxonomy deliberately keeps the gateway opaque to end users: a
//! timeout and a gateway failure render as the same undifferentiated
//! message, so backend detail never leaks into the booking UI.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Input Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Gateway Errors ====================
    #[error("Gateway did not respond within the timeout")]
    Timeout,

    #[error("Gateway error: {0}")]
    Gateway(String),

    // ==================== Workflow Errors ====================
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // ==================== Promo Store Errors ====================
    #[error("Promo store error: {0}")]
    PromoStore(String),

    #[error("Promo store connection failed: {0}")]
    PromoStoreConnection(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict(_) => StatusCode::CONFLICT,

            // 502 Bad Gateway
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,

            // 504 Gateway Timeout
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Timeout => "availability_unknown",
            AppError::Gateway(_) => "availability_unknown",
            AppError::Conflict(_) => "conflict",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::PromoStore(_) => "promo_store_error",
            AppError::PromoStoreConnection(_) => "promo_store_connection_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// Returns the message rendered to end users.
    ///
    /// Timeout and gateway failures collapse into one generic message; the
    /// full detail stays in the logs only.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Timeout | AppError::Gateway(_) => {
                "We cannot determine availability right now. Please try again in a moment."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for errors the user can recover from by changing inputs or retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Timeout | AppError::Gateway(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.user_message(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
