//! Store Errors
//!
//! Error types for follow, notification and profile persistence.

/// Errors that can occur in the stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or timed out
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Constraint violation or lost race on an identity key
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// Row could not be mapped back to a domain value
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Check if this error is a conflict (including unique violations)
    pub fn is_conflict(&self) -> bool {
        match self {
            StoreError::Conflict(_) => true,
            StoreError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Conflict(_) | StoreError::Database(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_retryable() {
        let conflict = StoreError::Conflict("notifications_action_user_id".to_string());
        assert!(conflict.is_retryable());
        assert!(conflict.is_conflict());

        let timeout = StoreError::Database(sqlx::Error::PoolTimedOut);
        assert!(timeout.is_retryable());
        assert!(!timeout.is_conflict());

        let bad_row = StoreError::InvalidRow("followable_type 'Tag'".to_string());
        assert!(!bad_row.is_retryable());
    }
}
