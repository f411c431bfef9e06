use chrono::Utc;
use diesel::prelude::*;

use crate::domain::session::{NewStoredSession, StoredSession};
use crate::domain::types::SessionKey;
use crate::domain::user::UserProfile;
use crate::models::session::{NewSession as DbNewSession, Session as DbSession, encode_profile};
use crate::repository::{DieselRepository, RepositoryResult, SessionReader, SessionWriter};

impl SessionReader for DieselRepository {
    fn get_session(&self, key: &SessionKey) -> RepositoryResult<Option<StoredSession>> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;

        let session = sessions::table
            .filter(sessions::session_key.eq(key.as_str()))
            .select(DbSession::as_select())
            .first::<DbSession>(&mut conn)
            .optional()?;

        let session = session.map(TryInto::try_into).transpose()?;
        Ok(session)
    }
}

impl SessionWriter for DieselRepository {
    fn create_session(&self, session: &NewStoredSession) -> RepositoryResult<usize> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;
        let db_session: DbNewSession = session.clone().try_into()?;

        let affected = diesel::insert_into(sessions::table)
            .values(db_session)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_session_user(
        &self,
        key: &SessionKey,
        user: &UserProfile,
    ) -> RepositoryResult<usize> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;
        let profile = encode_profile(user)?;

        let affected =
            diesel::update(sessions::table.filter(sessions::session_key.eq(key.as_str())))
                .set((
                    sessions::user_profile.eq(profile),
                    sessions::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_session(&self, key: &SessionKey) -> RepositoryResult<usize> {
        use crate::schema::sessions;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(sessions::table.filter(sessions::session_key.eq(key.as_str())))
                .execute(&mut conn)?;

        Ok(affected)
    }
}
