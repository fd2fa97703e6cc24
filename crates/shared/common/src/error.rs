//! Unified application error.
//!
//! Wraps domain errors unchanged so callers can still match on the exact
//! rule that failed, and adds the infrastructure failures the domain crate
//! knows nothing about.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Business rules
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Input
    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Settings
    #[error("{0}")]
    ImproperlyConfigured(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => e.code(),
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ImproperlyConfigured(_) => "IMPROPERLY_CONFIGURED",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal domain error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Domain(e) => e.to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::ImproperlyConfigured(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    /// The wrapped domain error, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| DomainError::not_found(entity).into())
    }
}

/// Convenience constructors
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn improperly_configured(msg: impl Into<String>) -> Self {
        AppError::ImproperlyConfigured(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
