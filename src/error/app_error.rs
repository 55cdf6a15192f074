use axum::extract::rejection::JsonRejection;
use diesel_async::pooled_connection::bb8::RunError;
use thiserror::Error;

use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Each variant maps to exactly one HTTP status code (see the error handler
/// in `api::middleware`), so handlers never have to pick a status for a
/// failure themselves.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique business rules and constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error for a single field
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Validation errors collected from a `validator::Validate` pass
    #[error("Validation failed: {}", format_field_errors(.errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

fn format_field_errors(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Shorthand for a `NotFound` on a villa identifier.
    pub fn villa_not_found(id: i32) -> Self {
        AppError::NotFound {
            entity: "villa".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    /// Shorthand for a `BadRequest` with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    /// Client-facing messages for the response envelope.
    ///
    /// Server-side variants return a generic message; their sources are only logged.
    pub fn client_messages(&self) -> Vec<String> {
        match self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => vec![format!("{} with {} {} was not found", entity, field, value)],
            AppError::Duplicate {
                entity,
                field,
                value,
            } => vec![format!(
                "A {} with {} '{}' already exists",
                entity, field, value
            )],
            AppError::Validation { field, reason } => vec![format!("{}: {}", field, reason)],
            AppError::ValidationErrors { errors } => {
                errors.iter().map(ToString::to_string).collect()
            }
            AppError::BadRequest { message } => vec![message.clone()],
            AppError::Database { operation, .. } => {
                vec![format!("Database operation failed: {}", operation)]
            }
            AppError::Configuration { key, .. } => vec![format!("Configuration error: {}", key)],
            AppError::ConnectionPool { .. } => vec!["Database connection unavailable".to_string()],
            AppError::Internal { .. } => vec!["An internal error occurred".to_string()],
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<RunError> for AppError {
    fn from(error: RunError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "configuration".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| ValidationFieldError {
                    field: field.clone(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));

        AppError::ValidationErrors {
            errors: field_errors,
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
