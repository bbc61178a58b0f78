use std::error::Error;
use std::fmt;

use thiserror::Error as ThisError;

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Db(sea_orm::DbErr),
    Json(serde_json::Error),
    Invalid(ValidationError),
    NotFound(String),
    InvalidInput(String),
    Config(String),
}

/// Reasons an externally sourced document is rejected at the boundary.
#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("document is not valid JSON: {0}")]
    Unparseable(String),
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("document has no `roles` array")]
    MissingRoles,
    #[error("document `nextId` must be a number or a string")]
    BadNextId,
    #[error("document nodes are malformed: {0}")]
    Malformed(String),
    #[error("document reuses id `{0}`")]
    DuplicateId(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Db(err) => write!(f, "database error: {err}"),
            AppError::Json(err) => write!(f, "json error: {err}"),
            AppError::Invalid(err) => write!(f, "invalid document: {err}"),
            AppError::NotFound(message) => write_multiline(f, "Not found", message),
            AppError::InvalidInput(message) => write_multiline(f, "Invalid input", message),
            AppError::Config(message) => write_multiline(f, "Configuration error", message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Db(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Invalid(err) => Some(err),
            AppError::NotFound(_) | AppError::InvalidInput(_) | AppError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

fn write_multiline(f: &mut fmt::Formatter<'_>, label: &str, message: &str) -> fmt::Result {
    if message.contains('\n') {
        write!(f, "{label}:\n{message}")
    } else {
        write!(f, "{label}: {message}")
    }
}
