//! Data access seams.
//!
//! Catalog entities (categories, videos, students, billing, accounts) live in
//! the REST backend and are reached through [`ApiRepository`]. Dashboard
//! sessions live in SQLite and are reached through [`DieselRepository`].
#![allow(async_fn_in_trait)]

use crate::db::{DbConnection, DbPool};
use crate::domain::billing::{CheckoutSession, PortalSession};
use crate::domain::category::{Category, CategoryPatch, NewCategory};
use crate::domain::page::Page;
use crate::domain::session::{NewStoredSession, StoredSession};
use crate::domain::student::{LinkedStudent, NewStudentLink};
use crate::domain::types::{CategoryId, SessionKey, StudentLinkId, VideoId};
use crate::domain::user::{AuthSession, Credentials, NewAccount, UserProfile};
use crate::domain::video::{NewVideo, Video, VideoListQuery, VideoPatch};

#[cfg(feature = "server")]
pub mod api;
pub mod errors;
pub mod session;

#[cfg(feature = "server")]
pub use api::ApiRepository;
pub use errors::{FieldErrors, RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Which categories to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryScope {
    /// Every category visible to the requester.
    #[default]
    All,
    /// Only categories owned by the requester.
    Mine,
}

/// Query parameters used when listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub scope: CategoryScope,
}

impl CategoryListQuery {
    pub fn all() -> Self {
        Self {
            scope: CategoryScope::All,
        }
    }

    pub fn mine() -> Self {
        Self {
            scope: CategoryScope::Mine,
        }
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories as a flat, unordered collection.
    async fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities. Only the owner may update or delete.
pub trait CategoryWriter {
    /// Persist a new category owned by the requester.
    async fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace name, description and parent of a category.
    async fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> RepositoryResult<Category>;
    /// Delete a category, its children, and its video associations.
    async fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

/// Read-only operations for video entities.
pub trait VideoReader {
    /// Consumer-facing feed filtered by category slug and search term.
    async fn list_videos(&self, query: &VideoListQuery) -> RepositoryResult<Page<Video>>;
    /// Videos owned by the requesting professional.
    async fn list_my_videos(&self, page: Option<usize>) -> RepositoryResult<Page<Video>>;
}

/// Write operations for video entities. Only the owner may update or delete.
pub trait VideoWriter {
    /// Upload a file or register an external URL.
    async fn create_video(&self, video: &NewVideo) -> RepositoryResult<Video>;
    /// Replace title, description and the complete category set.
    async fn update_video(&self, id: VideoId, patch: &VideoPatch) -> RepositoryResult<Video>;
    /// Delete a video.
    async fn delete_video(&self, id: VideoId) -> RepositoryResult<()>;
}

/// Read-only access to the authenticated account.
pub trait AccountReader {
    /// Fetch the current profile of the token holder.
    async fn current_user(&self) -> RepositoryResult<UserProfile>;
}

/// Operations issuing bearer tokens.
pub trait AccountWriter {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession>;
    async fn register(&self, account: &NewAccount) -> RepositoryResult<AuthSession>;
}

/// Read-only operations for linked students.
pub trait StudentReader {
    async fn list_students(&self) -> RepositoryResult<Vec<LinkedStudent>>;
}

/// Write operations for linked students.
pub trait StudentWriter {
    async fn add_student(&self, link: &NewStudentLink) -> RepositoryResult<LinkedStudent>;
    async fn remove_student(&self, id: StudentLinkId) -> RepositoryResult<()>;
}

/// Billing provider redirects.
pub trait BillingWriter {
    async fn create_checkout(&self) -> RepositoryResult<CheckoutSession>;
    async fn create_portal(&self) -> RepositoryResult<PortalSession>;
}

/// Turns media paths returned by the backend into playable URLs.
pub trait MediaLocator {
    fn media_url(&self, path: &str) -> String;
}

/// Read-only operations for persisted dashboard sessions.
pub trait SessionReader {
    /// Retrieve a session by its key.
    fn get_session(&self, key: &SessionKey) -> RepositoryResult<Option<StoredSession>>;
}

/// Write operations for persisted dashboard sessions.
pub trait SessionWriter {
    /// Persist a new session.
    fn create_session(&self, session: &NewStoredSession) -> RepositoryResult<usize>;
    /// Store a refreshed user profile for a session.
    fn update_session_user(&self, key: &SessionKey, user: &UserProfile)
    -> RepositoryResult<usize>;
    /// Delete a session.
    fn delete_session(&self, key: &SessionKey) -> RepositoryResult<usize>;
}
