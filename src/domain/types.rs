//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, names, slugs and URLs coming from forms or from the backend
//! are checked at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// E-mail validation failed.
    #[error("{0} must be a valid e-mail address")]
    InvalidEmail(&'static str),
    /// A value exceeded its maximum length in characters.
    #[error("{0} must be at most {1} characters long")]
    TooLong(&'static str, usize),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl TypeConstraintError {
    /// Name of the offending field, when the error carries one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NonPositiveId(field)
            | Self::EmptyString(field)
            | Self::InvalidUrl(field)
            | Self::InvalidEmail(field)
            | Self::TooLong(field, _) => Some(field),
            Self::InvalidValue(_) => None,
        }
    }
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Shared API of the string-backed newtypes below. `$check` turns the raw
/// input into the stored value or rejects it.
macro_rules! string_newtype {
    ($name:ident, $doc:expr, $check:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let check: fn(String) -> Result<String, TypeConstraintError> = $check;
                check(value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Positive `i32` identifiers assigned by the backend.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value <= 0 {
                    return Err(TypeConstraintError::NonPositiveId($field));
                }
                Ok(Self(value))
            }

            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        string_newtype!($name, $doc, |value| trim_and_require_non_empty(value, $field));
    };
}

macro_rules! url_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        string_newtype!($name, $doc, |value| {
            let trimmed = trim_and_require_non_empty(value, $field)?;
            if trimmed.as_str().validate_url() {
                Ok(trimmed)
            } else {
                Err(TypeConstraintError::InvalidUrl($field))
            }
        });
    };
}

/// Trimmed, non-empty and at most `$max` characters long.
macro_rules! bounded_string_newtype {
    ($name:ident, $doc:expr, $field:expr, $max:expr) => {
        string_newtype!($name, $doc, |value| {
            let trimmed = trim_and_require_non_empty(value, $field)?;
            if trimmed.chars().count() > $max {
                return Err(TypeConstraintError::TooLong($field, $max));
            }
            Ok(trimmed)
        });

        impl $name {
            pub const MAX_LEN: usize = $max;
        }
    };
}

id_newtype!(UserId, "Unique identifier for a backend user.", "user_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(VideoId, "Unique identifier for a video.", "video_id");
id_newtype!(
    StudentLinkId,
    "Identifier of a professional to student link.",
    "student_link_id"
);

bounded_string_newtype!(CategoryName, "Category name.", "name", 100);
bounded_string_newtype!(VideoTitle, "Video title.", "title", 255);

non_empty_string_newtype!(
    CategorySlug,
    "URL-safe category slug assigned by the backend.",
    "slug"
);
non_empty_string_newtype!(
    AccessToken,
    "Bearer token sent with every backend request.",
    "access token"
);
non_empty_string_newtype!(
    RefreshToken,
    "Refresh token issued alongside the access token.",
    "refresh token"
);
non_empty_string_newtype!(
    SessionKey,
    "Opaque key naming a persisted dashboard session.",
    "session key"
);

url_string_newtype!(VideoUrl, "External playable video URL.", "video_url");
url_string_newtype!(RedirectUrl, "Billing provider redirect URL.", "redirect url");

/// Normalized (trimmed, lowercased) e-mail address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Trims, lowercases and validates an e-mail address.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?.to_lowercase();
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(trimmed))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned address.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
