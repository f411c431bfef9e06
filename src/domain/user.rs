use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AccessToken, Email, RefreshToken, UserId};

/// Account role as reported by the authentication service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Professional,
    User,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Professional => "professional",
            Self::User => "user",
        }
    }
}

/// Billing subscription state of a professional account.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
    Unpaid,
    Trialing,
    #[default]
    #[serde(rename = "")]
    None,
}

/// Public profile attached to professional accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfessionalProfile {
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub cref: String,
}

/// Authenticated user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub role_display: String,
    #[serde(default)]
    pub professional_profile: Option<ProfessionalProfile>,
    #[serde(default, deserialize_with = "deserialize_subscription_status")]
    pub subscription_status: SubscriptionStatus,
    #[serde(default)]
    pub has_active_subscription: bool,
    pub date_joined: DateTime<Utc>,
}

fn deserialize_subscription_status<'de, D>(deserializer: D) -> Result<SubscriptionStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<SubscriptionStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserProfile {
    /// Name shown in the header: professional full name, then first/last
    /// name, then e-mail.
    pub fn display_name(&self) -> String {
        if let Some(profile) = &self.professional_profile {
            if !profile.full_name.trim().is_empty() {
                return profile.full_name.clone();
            }
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.as_str().to_string()
        } else {
            full.to_string()
        }
    }
}

/// Access and refresh tokens issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserProfile,
}

/// Credentials for `POST /auth/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

/// Account data for `POST /auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: Email,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bio: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cref: String,
}
