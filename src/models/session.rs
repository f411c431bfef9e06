use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::session::{NewStoredSession, StoredSession};
use crate::domain::types::{AccessToken, RefreshToken, SessionKey, TypeConstraintError};
use crate::domain::user::{TokenPair, UserProfile};

/// Diesel model representing the `sessions` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(primary_key(session_key))]
pub struct Session {
    pub session_key: String,
    pub user_id: i32,
    pub access_token: String,
    pub refresh_token: String,
    /// User profile serialized as JSON.
    pub user_profile: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Session`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession {
    pub session_key: String,
    pub user_id: i32,
    pub access_token: String,
    pub refresh_token: String,
    pub user_profile: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn profile_error(error: serde_json::Error) -> TypeConstraintError {
    TypeConstraintError::InvalidValue(format!("stored user profile: {error}"))
}

/// Serialize a profile for the `user_profile` column.
pub fn encode_profile(user: &UserProfile) -> Result<String, TypeConstraintError> {
    serde_json::to_string(user).map_err(profile_error)
}

impl TryFrom<Session> for StoredSession {
    type Error = TypeConstraintError;

    fn try_from(session: Session) -> Result<Self, Self::Error> {
        let user: UserProfile =
            serde_json::from_str(&session.user_profile).map_err(profile_error)?;
        Ok(Self {
            key: SessionKey::new(session.session_key)?,
            tokens: TokenPair {
                access: AccessToken::new(session.access_token)?,
                refresh: RefreshToken::new(session.refresh_token)?,
            },
            user,
            created_at: session.created_at,
            updated_at: session.updated_at,
        })
    }
}

impl TryFrom<NewStoredSession> for NewSession {
    type Error = TypeConstraintError;

    fn try_from(session: NewStoredSession) -> Result<Self, Self::Error> {
        Ok(Self {
            user_profile: encode_profile(&session.user)?,
            session_key: session.key.into_inner(),
            user_id: session.user.id.get(),
            access_token: session.tokens.access.into_inner(),
            refresh_token: session.tokens.refresh.into_inner(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        })
    }
}
