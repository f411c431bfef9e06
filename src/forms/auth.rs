use serde::Deserialize;
use validator::Validate;

use crate::domain::types::Email;
use crate::domain::user::{Credentials, NewAccount, UserRole};
use crate::repository::FieldErrors;

form_error!(AuthFormError, "Account");

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: u64 = 8;

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Informe um e-mail válido."))]
    pub email: String,
    #[validate(length(min = 1, message = "Informe a senha."))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = AuthFormError;

    fn try_from(mut value: LoginForm) -> Result<Self, Self::Error> {
        value.email = value.email.trim().to_string();
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

/// Role chosen at sign-up. Admin accounts are not self-service.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    #[default]
    User,
    Professional,
}

impl RegisterRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Professional => "professional",
        }
    }
}

impl From<RegisterRole> for UserRole {
    fn from(value: RegisterRole) -> Self {
        match value {
            RegisterRole::User => UserRole::User,
            RegisterRole::Professional => UserRole::Professional,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email(message = "Informe um e-mail válido."))]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[validate(length(min = MIN_PASSWORD_LEN, message = "A senha deve ter pelo menos 8 caracteres."))]
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: RegisterRole,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub cref: String,
}

fn push(fields: &mut FieldErrors, field: &str, message: &str) {
    fields
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Trimmed, lowercased username; spaces are rejected rather than stripped.
fn normalize_username(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.contains(char::is_whitespace) {
        return Err(
            "Nome de usuário não pode conter espaços. Use apenas letras, números e underline.",
        );
    }
    Ok(trimmed.to_lowercase())
}

impl TryFrom<RegisterForm> for NewAccount {
    type Error = AuthFormError;

    fn try_from(mut value: RegisterForm) -> Result<Self, Self::Error> {
        value.email = value.email.trim().to_string();

        let mut fields = match value.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => crate::forms::validation_fields(&errors),
        };

        let username = match normalize_username(&value.username) {
            Ok(username) => username,
            Err(message) => {
                push(&mut fields, "username", message);
                String::new()
            }
        };
        if value.password != value.password_confirm {
            push(&mut fields, "password_confirm", "Senhas não conferem.");
        }
        let full_name = value.full_name.trim().to_string();
        if value.role == RegisterRole::Professional && full_name.is_empty() {
            push(
                &mut fields,
                "full_name",
                "Profissionais devem informar o nome completo.",
            );
        }
        if !fields.is_empty() {
            return Err(AuthFormError::Validation(fields));
        }

        Ok(Self {
            email: Email::new(value.email)?,
            username,
            password: value.password,
            password_confirm: value.password_confirm,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
            role: value.role.into(),
            full_name,
            bio: value.bio.trim().to_string(),
            cref: value.cref.trim().to_string(),
        })
    }
}
