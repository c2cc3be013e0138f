//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Followable type is neither `User` nor `Organization`
    #[error("Invalid followable type: {0}")]
    InvalidTargetType(String),
}

impl DomainError {
    pub fn invalid_target_type(raw: impl Into<String>) -> Self {
        Self::InvalidTargetType(raw.into())
    }
}
