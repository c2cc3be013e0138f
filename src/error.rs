//! Error handling module
//!
//! Centralized error types for the aggregation flow.

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid followable type: {0}")]
    InvalidTargetType(String),

    #[error("Profile not found for user {0}")]
    ProfileNotFound(i64),

    // Store errors are surfaced as-is; retry policy belongs to the caller
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidTargetType(raw) => AppError::InvalidTargetType(raw),
        }
    }
}

impl AppError {
    /// Check if the upstream handler may retry the whole call
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Store(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Stable machine-readable code, used in structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidTargetType(_) => "invalid_target_type",
            AppError::ProfileNotFound(_) => "profile_not_found",
            AppError::Store(e) if e.is_conflict() => "store_conflict",
            AppError::Store(_) => "store_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        let err: AppError = DomainError::InvalidTargetType("Podcast".to_string()).into();
        assert!(matches!(err, AppError::InvalidTargetType(ref t) if t == "Podcast"));
        assert_eq!(err.error_code(), "invalid_target_type");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_error_codes() {
        let conflict: AppError = StoreError::Conflict("duplicate key".to_string()).into();
        assert_eq!(conflict.error_code(), "store_conflict");
        assert!(conflict.is_retryable());

        let down: AppError = StoreError::Unavailable("connection refused".to_string()).into();
        assert_eq!(down.error_code(), "store_unavailable");
        assert!(down.to_string().contains("connection refused"));
    }
}
