use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, StudentLinkId, UserId};

/// Consumer account granted access to a professional's videos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedStudent {
    pub id: StudentLinkId,
    pub student_id: UserId,
    pub email: Email,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /auth/students/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewStudentLink {
    pub email: Email,
}
