use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type shared by the core services and the composite.
///
/// Services raise these variants; only the HTTP boundary decides which status
/// code and envelope a variant turns into.
#[derive(Error, Debug)]
pub enum AppError {
    /// Entity lookup by natural key found nothing
    #[error("{message}")]
    NotFound { message: String },

    /// Semantically invalid input such as a non-positive product id
    #[error("{message}")]
    InvalidInput { message: String },

    /// Request parameter missing, not convertible, or a malformed body
    #[error("{message}")]
    BadRequest { message: String },

    /// Unique constraint violation reported by a repository
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Optimistic-lock version mismatch
    #[error("{message}")]
    Conflict { message: String },

    /// A downstream service could not be reached
    #[error("{message}")]
    ServiceUnavailable { message: String },

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

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        AppError::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Short variant name, used as the prefix of unclassified error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NotFound",
            AppError::InvalidInput { .. } => "InvalidInput",
            AppError::BadRequest { .. } => "BadRequest",
            AppError::Duplicate { .. } => "Duplicate",
            AppError::Conflict { .. } => "Conflict",
            AppError::ServiceUnavailable { .. } => "ServiceUnavailable",
            AppError::Database { .. } => "DatabaseError",
            AppError::Configuration { .. } => "ConfigurationError",
            AppError::ConnectionPool { .. } => "ConnectionPoolError",
            AppError::Internal { .. } => "InternalError",
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

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::msg(error.to_string()),
        }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field));
                    match e.params.get("value") {
                        Some(value) => format!("{}: {}", message, value),
                        None => message,
                    }
                })
            })
            .collect();
        messages.sort();
        AppError::InvalidInput {
            message: messages.join(", "),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
