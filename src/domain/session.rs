use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::SessionKey;
use crate::domain::user::{TokenPair, UserProfile};

/// Dashboard login persisted between requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub key: SessionKey,
    pub tokens: TokenPair,
    pub user: UserProfile,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to persist a new [`StoredSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewStoredSession {
    pub key: SessionKey,
    pub tokens: TokenPair,
    pub user: UserProfile,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
