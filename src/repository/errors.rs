use std::collections::BTreeMap;

use thiserror::Error;

/// Field name mapped to the validation messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend rejected the submitted fields.
    #[error("validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },
    /// The bearer token is missing, expired or lacks permission.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The requested record does not exist or is not visible to the requester.
    #[error("not found")]
    NotFound,
    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Connection(String),
    /// Any other non-2xx response.
    #[error("backend responded with {status}: {message}")]
    Backend { status: u16, message: String },
    /// The backend answered with a body that does not match the expected shape.
    #[error("unexpected backend response: {0}")]
    Decode(String),
    /// A value violated a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Convenient alias for results returned from repositories.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
