//! Helpers for integration tests.

use chrono::{DateTime, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use fitvideo_dashboard::db::{DbPool, establish_connection_pool};
use fitvideo_dashboard::domain::session::NewStoredSession;
use fitvideo_dashboard::domain::types::{AccessToken, Email, RefreshToken, SessionKey, UserId};
use fitvideo_dashboard::domain::user::{SubscriptionStatus, TokenPair, UserProfile, UserRole};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn sample_profile(status: SubscriptionStatus) -> UserProfile {
    UserProfile {
        id: UserId::new(3).expect("valid user id"),
        email: Email::new("coach@example.com").expect("valid email"),
        username: "coach".into(),
        first_name: "Ana".into(),
        last_name: "Lima".into(),
        role: UserRole::Professional,
        role_display: "Profissional".into(),
        professional_profile: None,
        subscription_status: status,
        has_active_subscription: status == SubscriptionStatus::Active,
        date_joined: DateTime::from_timestamp(1_738_400_000, 0).expect("valid timestamp"),
    }
}

pub fn sample_session(key: &str) -> NewStoredSession {
    let now = Utc::now().naive_utc();
    NewStoredSession {
        key: SessionKey::new(key).expect("valid session key"),
        tokens: TokenPair {
            access: AccessToken::new("a.b.c").expect("valid token"),
            refresh: RefreshToken::new("d.e.f").expect("valid token"),
        },
        user: sample_profile(SubscriptionStatus::None),
        created_at: now,
        updated_at: now,
    }
}
