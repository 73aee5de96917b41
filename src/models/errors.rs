use thiserror::Error;

use crate::models::CustomerError;

/// Service-level errors that can occur in business logic.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("customer error: {source}")]
    Customer {
        #[from]
        source: CustomerError,
    },

    #[error("repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },

    #[error("background task failed: {source}")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Repository-level errors for data access operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
