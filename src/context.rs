//! Per-request application context.
//!
//! The identity cookie only carries an opaque session key. The bearer tokens
//! and the user profile live in the session store and are loaded into an
//! [`AppContext`] for every authenticated request.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::capability::{Capability, can, has_active_subscription};
use crate::domain::session::NewStoredSession;
use crate::domain::types::SessionKey;
use crate::domain::user::{AuthSession, TokenPair, UserProfile};
use crate::repository::{
    ApiRepository, DieselRepository, RepositoryResult, SessionReader, SessionWriter,
};

/// Authenticated state of the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct AppContext {
    pub session_key: SessionKey,
    pub tokens: TokenPair,
    pub user: UserProfile,
}

/// What templates get to know about the signed-in user.
#[derive(Debug, Serialize)]
pub struct CurrentUser<'a> {
    pub id: i32,
    pub email: &'a str,
    pub display_name: String,
    pub role: &'static str,
    pub is_professional: bool,
    pub has_active_subscription: bool,
    pub can_manage_catalog: bool,
    pub can_manage_students: bool,
    pub can_subscribe: bool,
    pub can_manage_billing: bool,
}

impl AppContext {
    /// Load the persisted session named by `key`.
    pub fn restore<R>(key: &SessionKey, repo: &R) -> RepositoryResult<Option<Self>>
    where
        R: SessionReader,
    {
        Ok(repo.get_session(key)?.map(|session| Self {
            session_key: session.key,
            tokens: session.tokens,
            user: session.user,
        }))
    }

    /// Persist a freshly issued login under a new random session key.
    pub fn establish<R>(auth: AuthSession, repo: &R) -> RepositoryResult<Self>
    where
        R: SessionWriter,
    {
        let key = SessionKey::new(Uuid::new_v4().to_string())?;
        let now = Utc::now().naive_utc();
        repo.create_session(&NewStoredSession {
            key: key.clone(),
            tokens: auth.tokens.clone(),
            user: auth.user.clone(),
            created_at: now,
            updated_at: now,
        })?;
        Ok(Self {
            session_key: key,
            tokens: auth.tokens,
            user: auth.user,
        })
    }

    /// Replace the cached profile, e.g. after the subscription changed.
    pub fn refresh_user<R>(&mut self, user: UserProfile, repo: &R) -> RepositoryResult<()>
    where
        R: SessionWriter,
    {
        repo.update_session_user(&self.session_key, &user)?;
        self.user = user;
        Ok(())
    }

    /// Forget the persisted session.
    pub fn teardown<R>(self, repo: &R) -> RepositoryResult<()>
    where
        R: SessionWriter,
    {
        repo.delete_session(&self.session_key)?;
        Ok(())
    }

    /// Backend client authenticated as this user.
    pub fn api(&self, base: &ApiRepository) -> ApiRepository {
        base.with_token(self.tokens.access.clone())
    }

    pub fn can(&self, capability: Capability) -> bool {
        can(&self.user, capability)
    }

    pub fn current_user(&self) -> CurrentUser<'_> {
        CurrentUser {
            id: self.user.id.get(),
            email: self.user.email.as_str(),
            display_name: self.user.display_name(),
            role: self.user.role.as_str(),
            is_professional: self.can(Capability::ManageCatalog),
            has_active_subscription: has_active_subscription(&self.user),
            can_manage_catalog: self.can(Capability::ManageCatalog),
            can_manage_students: self.can(Capability::ManageStudents),
            can_subscribe: self.can(Capability::Subscribe),
            can_manage_billing: self.can(Capability::ManageBilling),
        }
    }
}

fn to_login() -> actix_web::Error {
    InternalError::from_response(
        "authentication required",
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .finish(),
    )
    .into()
}

fn extract(req: &HttpRequest) -> Result<AppContext, actix_web::Error> {
    let identity = req.get_identity().map_err(|_| to_login())?;
    let key = identity.id().map_err(|_| to_login())?;
    let key = SessionKey::new(key).map_err(|_| to_login())?;

    let Some(repo) = req.app_data::<web::Data<DieselRepository>>() else {
        log::error!("Session store is not registered as app data");
        return Err(actix_web::error::ErrorInternalServerError("session store"));
    };

    match AppContext::restore(&key, repo.get_ref()) {
        Ok(Some(context)) => Ok(context),
        Ok(None) => {
            log::warn!("Session {key} not found in store");
            identity.logout();
            Err(to_login())
        }
        Err(e) => {
            log::error!("Failed to restore session: {e}");
            Err(actix_web::error::ErrorInternalServerError("session store"))
        }
    }
}

impl FromRequest for AppContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
