//! Error types for the library server

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error categories exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Validation,
    DuplicateKey,
    Internal,
}

impl ErrorKind {
    /// Name reported in the `error.name` field of the envelope
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::DuplicateKey => "DuplicateKeyError",
            ErrorKind::Internal => "InternalError",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput | ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateKey => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Detail for a single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub message: String,
    pub kind: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
        }
    }
}

/// Per-field validation failures, keyed by field name
pub type FieldErrors = BTreeMap<String, FieldError>;

/// First failure reported for each field
pub fn collect_field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), FieldError::new(message, e.code.to_string()))
            })
        })
        .collect()
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Not enough copies available ({available} available, {requested} requested)")]
    InsufficientCopies { available: i32, requested: i32 },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) | AppError::InsufficientCopies { .. } => {
                ErrorKind::InvalidInput
            }
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::InsufficientCopies { .. } => "Not enough copies available".to_string(),
            AppError::DuplicateKey(_) => "Duplicate key error".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return AppError::DuplicateKey(constraint);
            }
            if db_err.is_check_violation() {
                let constraint = db_err.constraint().unwrap_or("check").to_string();
                let mut errors = FieldErrors::new();
                errors.insert(
                    constraint.clone(),
                    FieldError::new(format!("Constraint {} violated", constraint), "check"),
                );
                return AppError::Validation(errors);
            }
        }
        AppError::Database(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(collect_field_errors(&errors))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Body of the `error` field in the envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}

/// Error response envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let errors = match err {
            AppError::Validation(fields) if !fields.is_empty() => Some(fields.clone()),
            _ => None,
        };

        ErrorResponse {
            success: false,
            message: err.public_message(),
            error: ErrorBody {
                name: err.kind().name().to_string(),
                errors,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::debug!("Request failed: {}", self),
        }

        (kind.status(), Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
