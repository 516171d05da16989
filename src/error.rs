//! Error types for Biblioteca server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::StoreError;

/// Stable application error codes reported in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    Duplicate = 8,
    BadValue = 18,
    NoSuchData = 20,
}

/// HTTP status used when a uniqueness violation is reported.
///
/// The book endpoints answer `409 Conflict`, the user endpoints have always
/// answered `400 Bad Request` for a duplicate email and clients rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStatus {
    Conflict,
    BadRequest,
}

impl ConflictStatus {
    fn status_code(self) -> StatusCode {
        match self {
            ConflictStatus::Conflict => StatusCode::CONFLICT,
            ConflictStatus::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        status: ConflictStatus,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { status, .. } => status.status_code(),
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::Validation(msg) => (ErrorCode::BadValue, msg),
            AppError::NotFound(msg) => (ErrorCode::NoSuchData, msg),
            AppError::Conflict { message, .. } => (ErrorCode::Duplicate, message),
            AppError::Unauthorized(msg) => (ErrorCode::NotAuthorized, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (ErrorCode::Failure, "Internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        AppError::Validation("Request body must be a valid JSON object".to_string())
    }
}

/// Maps store failures to the application error taxonomy.
///
/// Each endpoint builds one with the entity it works on, the message shown
/// when a uniqueness constraint is violated and the status that goes with it.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    entity: &'static str,
    duplicate_message: &'static str,
    conflict_status: ConflictStatus,
}

impl ErrorClassifier {
    pub const fn new(entity: &'static str, duplicate_message: &'static str) -> Self {
        Self {
            entity,
            duplicate_message,
            conflict_status: ConflictStatus::Conflict,
        }
    }

    pub const fn with_conflict_status(mut self, status: ConflictStatus) -> Self {
        self.conflict_status = status;
        self
    }

    /// Message reported when the referenced record does not exist
    pub fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found", self.entity))
    }

    pub fn classify(&self, err: StoreError) -> AppError {
        match err {
            StoreError::DuplicateKey(detail) => {
                tracing::debug!(entity = self.entity, %detail, "uniqueness violation");
                AppError::Conflict {
                    message: self.duplicate_message.to_string(),
                    status: self.conflict_status,
                }
            }
            StoreError::NotFound => self.not_found(),
            StoreError::Backend(detail) => {
                AppError::Internal(format!("{} store failure: {}", self.entity, detail))
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
