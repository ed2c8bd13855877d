//! Centralized error handling.
//!
//! Every failure here is a start-up configuration defect: the binary logs it
//! and exits before doing any other work.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Environment
    #[error("required environment variable {0} is not set")]
    MissingEnv(String),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidEnv { name: String, reason: String },

    // Connection strings
    #[error("invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("unsupported database scheme '{0}'")]
    UnsupportedDatabaseScheme(String),

    #[error("database URL is missing its {0}")]
    IncompleteDatabaseUrl(&'static str),

    // Process-wide settings
    #[error("settings have already been initialized")]
    AlreadyInitialized,

    #[error("settings have not been initialized")]
    NotInitialized,

    // Commands
    #[error("{0} deployment check(s) failed")]
    ChecksFailed(usize),

    #[error("host '{0}' is not allowed")]
    HostNotAllowed(String),

    // External service errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable error code, used in machine-readable CLI output
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::InvalidEnv { .. } => "INVALID_ENV",
            AppError::InvalidDatabaseUrl(_) => "INVALID_DATABASE_URL",
            AppError::UnsupportedDatabaseScheme(_) => "UNSUPPORTED_DATABASE_SCHEME",
            AppError::IncompleteDatabaseUrl(_) => "INCOMPLETE_DATABASE_URL",
            AppError::AlreadyInitialized => "ALREADY_INITIALIZED",
            AppError::NotInitialized => "NOT_INITIALIZED",
            AppError::ChecksFailed(_) => "CHECKS_FAILED",
            AppError::HostNotAllowed(_) => "HOST_NOT_ALLOWED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error comes from the deployment environment rather than a
    /// failing external system
    pub fn is_configuration(&self) -> bool {
        !matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("serialization failed: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::InvalidDatabaseUrl(err.to_string())
    }
}

/// Convenience constructors
impl AppError {
    pub fn missing_env(name: impl Into<String>) -> Self {
        AppError::MissingEnv(name.into())
    }

    pub fn invalid_env(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidEnv {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_database_url(msg: impl Into<String>) -> Self {
        AppError::InvalidDatabaseUrl(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
