//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::auth::AuthFormError;
    use crate::forms::categories::CategoryFormError;
    use crate::forms::students::StudentFormError;
    use crate::forms::videos::VideoFormError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<CategoryFormError> for ServiceError {
        fn from(val: CategoryFormError) -> Self {
            ServiceError::Validation(val.into_fields())
        }
    }

    impl From<VideoFormError> for ServiceError {
        fn from(val: VideoFormError) -> Self {
            ServiceError::Validation(val.into_fields())
        }
    }

    impl From<AuthFormError> for ServiceError {
        fn from(val: AuthFormError) -> Self {
            ServiceError::Validation(val.into_fields())
        }
    }

    impl From<StudentFormError> for ServiceError {
        fn from(val: StudentFormError) -> Self {
            ServiceError::Validation(val.into_fields())
        }
    }
}
