//! Form decoding and validation.
//!
//! Each form is deserialized from the request, validated with `validator`,
//! then converted into a payload built from domain types. Failures are
//! reported per field so templates can show them next to the inputs.

use validator::ValidationErrors;

use crate::domain::types::{CategoryId, TypeConstraintError};
use crate::repository::FieldErrors;

/// Key used for messages that do not belong to a single input.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Flatten `validator` errors into field messages.
pub fn validation_fields(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, errors) in errors.field_errors() {
        let messages = errors
            .iter()
            .map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("invalid value ({})", error.code),
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    fields
}

/// Report a constraint error against the field it names.
pub fn constraint_fields(error: &TypeConstraintError) -> FieldErrors {
    let mut fields = FieldErrors::new();
    let field = error.field().unwrap_or(NON_FIELD_ERRORS);
    fields.insert(field.to_string(), vec![error.to_string()]);
    fields
}

/// Parse an optional `<select>` value: blank means none.
pub(crate) fn optional_category_id(
    value: Option<&str>,
) -> Result<Option<CategoryId>, TypeConstraintError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => {
            let id: i32 = raw
                .parse()
                .map_err(|_| TypeConstraintError::NonPositiveId("parent"))?;
            CategoryId::new(id)
                .map(Some)
                .map_err(|_| TypeConstraintError::NonPositiveId("parent"))
        }
    }
}

/// Generates the error type shared by the forms of one module.
macro_rules! form_error {
    ($name:ident, $label:expr) => {
        #[derive(Debug, thiserror::Error)]
        pub enum $name {
            #[error("{label} form validation failed", label = $label)]
            Validation(crate::repository::FieldErrors),
            #[error("{label} form contains invalid data: {0}", label = $label)]
            TypeConstraint(crate::domain::types::TypeConstraintError),
        }

        impl $name {
            /// Messages keyed by the input they belong to.
            pub fn into_fields(self) -> crate::repository::FieldErrors {
                match self {
                    Self::Validation(fields) => fields,
                    Self::TypeConstraint(error) => crate::forms::constraint_fields(&error),
                }
            }
        }

        impl From<validator::ValidationErrors> for $name {
            fn from(value: validator::ValidationErrors) -> Self {
                Self::Validation(crate::forms::validation_fields(&value))
            }
        }

        impl From<crate::domain::types::TypeConstraintError> for $name {
            fn from(value: crate::domain::types::TypeConstraintError) -> Self {
                Self::TypeConstraint(value)
            }
        }
    };
}

pub mod auth;
pub mod categories;
pub mod students;
pub mod videos;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_select_means_no_parent() {
        assert_eq!(optional_category_id(None).unwrap(), None);
        assert_eq!(optional_category_id(Some(" ")).unwrap(), None);
        assert_eq!(
            optional_category_id(Some("3")).unwrap(),
            Some(CategoryId::new(3).unwrap())
        );
        assert!(optional_category_id(Some("zero")).is_err());
    }

    #[test]
    fn form_errors_name_their_form() {
        let err = categories::CategoryFormError::Validation(FieldErrors::new());
        assert_eq!(err.to_string(), "Category form validation failed");

        let err = videos::VideoFormError::from(TypeConstraintError::NonPositiveId("video_id"));
        assert_eq!(
            err.to_string(),
            "Video form contains invalid data: video_id must be greater than zero"
        );
    }

    #[test]
    fn constraint_errors_land_on_their_field() {
        let fields = constraint_fields(&TypeConstraintError::TooLong("name", 100));
        assert_eq!(
            fields["name"],
            vec!["name must be at most 100 characters long".to_string()]
        );
    }
}
