use diesel::prelude::*;
use fitvideo_dashboard::domain::types::SessionKey;
use fitvideo_dashboard::domain::user::SubscriptionStatus;
use fitvideo_dashboard::repository::{DieselRepository, SessionReader, SessionWriter};
use fitvideo_dashboard::schema::sessions;

mod common;

#[test]
fn test_session_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let new_session = common::sample_session("key-1");
    let inserted = repo
        .create_session(&new_session)
        .expect("should create session");
    assert_eq!(inserted, 1);

    let stored = repo
        .get_session(&new_session.key)
        .expect("should read session")
        .expect("session should exist");
    assert_eq!(stored.tokens, new_session.tokens);
    assert_eq!(stored.user, new_session.user);

    let deleted = repo
        .delete_session(&new_session.key)
        .expect("should delete session");
    assert_eq!(deleted, 1);
    assert!(
        repo.get_session(&new_session.key)
            .expect("should query session")
            .is_none()
    );
}

#[test]
fn update_session_user_replaces_cached_profile() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let new_session = common::sample_session("key-2");
    repo.create_session(&new_session)
        .expect("should create session");

    let active = common::sample_profile(SubscriptionStatus::Active);
    let updated = repo
        .update_session_user(&new_session.key, &active)
        .expect("should update session");
    assert_eq!(updated, 1);

    let stored = repo
        .get_session(&new_session.key)
        .expect("should read session")
        .expect("session should exist");
    assert_eq!(stored.user.subscription_status, SubscriptionStatus::Active);
    assert!(stored.user.has_active_subscription);
}

#[test]
fn unknown_session_key_is_absent() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let key = SessionKey::new("missing").expect("valid session key");

    assert!(repo.get_session(&key).expect("should query").is_none());
    assert_eq!(repo.delete_session(&key).expect("should delete"), 0);
}

#[test]
fn corrupted_profile_is_reported_as_error() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let new_session = common::sample_session("key-3");
    repo.create_session(&new_session)
        .expect("should create session");

    let mut conn = test_db.pool().get().expect("should acquire connection");
    diesel::update(sessions::table.filter(sessions::session_key.eq("key-3")))
        .set(sessions::user_profile.eq("{not json"))
        .execute(&mut conn)
        .expect("should corrupt profile");

    assert!(repo.get_session(&new_session.key).is_err());
}
