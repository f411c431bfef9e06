use thiserror::Error;

use crate::forms::NON_FIELD_ERRORS;
use crate::repository::{FieldErrors, RepositoryError};

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The signed-in user lacks the capability for the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// The backend refused the operation for this user.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted data was rejected without field details.
    #[error("{0}")]
    Form(String),
    /// Submitted data was rejected; messages keyed by field name.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// A value violated a domain constraint.
    #[error("invalid data: {0}")]
    TypeConstraint(String),
    /// The backend could not be reached.
    #[error("backend unreachable")]
    Connection,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Log a repository failure for `action` and map it onto the service taxonomy.
    pub fn from_repository(action: &str, error: RepositoryError) -> Self {
        match error {
            RepositoryError::Validation { message, fields } => {
                log::warn!("Backend rejected {action}: {message}");
                if fields.is_empty() {
                    ServiceError::Form(message)
                } else {
                    ServiceError::Validation(fields)
                }
            }
            RepositoryError::Unauthorized(message) => {
                log::warn!("Backend refused {action}: {message}");
                ServiceError::Forbidden(message)
            }
            RepositoryError::NotFound => {
                log::warn!("Failed to {action}: not found");
                ServiceError::NotFound
            }
            RepositoryError::Connection(message) => {
                log::error!("Failed to {action}: {message}");
                ServiceError::Connection
            }
            other => {
                log::error!("Failed to {action}: {other}");
                ServiceError::Internal
            }
        }
    }

    /// Split rejected input from other failures. Rejections without field
    /// details are reported under [`NON_FIELD_ERRORS`].
    pub fn into_field_errors(self) -> Result<FieldErrors, ServiceError> {
        match self {
            ServiceError::Validation(fields) => Ok(fields),
            ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
                let mut fields = FieldErrors::new();
                fields.insert(NON_FIELD_ERRORS.to_string(), vec![message]);
                Ok(fields)
            }
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_validation_keeps_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("name".into(), vec!["required".into()]);
        let err = ServiceError::from_repository(
            "create category",
            RepositoryError::Validation {
                message: "invalid".into(),
                fields: fields.clone(),
            },
        );
        assert_eq!(err, ServiceError::Validation(fields));
    }

    #[test]
    fn validation_without_fields_is_a_form_error() {
        let err = ServiceError::from_repository(
            "create category",
            RepositoryError::Validation {
                message: "Apenas profissionais podem criar categorias.".into(),
                fields: FieldErrors::new(),
            },
        );
        assert_eq!(
            err,
            ServiceError::Form("Apenas profissionais podem criar categorias.".into())
        );
    }

    #[test]
    fn transport_failures_map_to_connection() {
        let err = ServiceError::from_repository(
            "list videos",
            RepositoryError::Connection("refused".into()),
        );
        assert_eq!(err, ServiceError::Connection);
        let err = ServiceError::from_repository(
            "list videos",
            RepositoryError::Decode("expected object".into()),
        );
        assert_eq!(err, ServiceError::Internal);
    }
}
