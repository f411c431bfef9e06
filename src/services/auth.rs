//! Sign-in, sign-up and session lifecycle.

use crate::context::AppContext;
use crate::domain::user::{AuthSession, Credentials, NewAccount};
use crate::repository::{AccountReader, AccountWriter, RepositoryError, SessionWriter};

use super::{ServiceError, ServiceResult};

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos.";

fn open_session<S>(auth: AuthSession, store: &S) -> ServiceResult<AppContext>
where
    S: SessionWriter,
{
    let user_id = auth.user.id;
    match AppContext::establish(auth, store) {
        Ok(ctx) => {
            log::info!("User {user_id} signed in");
            Ok(ctx)
        }
        Err(e) => {
            log::error!("Failed to persist session for user {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Exchange credentials for tokens and persist them under a new session key.
pub async fn login<A, S>(credentials: Credentials, api: &A, store: &S) -> ServiceResult<AppContext>
where
    A: AccountWriter,
    S: SessionWriter,
{
    match api.login(&credentials).await {
        Ok(auth) => open_session(auth, store),
        Err(RepositoryError::Unauthorized(_)) => {
            log::warn!("Rejected login for {}", credentials.email);
            Err(ServiceError::Form(INVALID_CREDENTIALS.to_string()))
        }
        Err(e) => Err(ServiceError::from_repository("log in", e)),
    }
}

/// Create an account and sign it in right away.
pub async fn register<A, S>(account: NewAccount, api: &A, store: &S) -> ServiceResult<AppContext>
where
    A: AccountWriter,
    S: SessionWriter,
{
    match api.register(&account).await {
        Ok(auth) => open_session(auth, store),
        Err(e) => Err(ServiceError::from_repository("register account", e)),
    }
}

pub fn logout<S>(ctx: AppContext, store: &S) -> ServiceResult<()>
where
    S: SessionWriter,
{
    let user_id = ctx.user.id;
    ctx.teardown(store).map_err(|e| {
        log::error!("Failed to delete session for user {user_id}: {e}");
        ServiceError::Internal
    })
}

/// Reload the profile from the backend, e.g. after a checkout completed.
pub async fn sync_profile<A, S>(ctx: &mut AppContext, api: &A, store: &S) -> ServiceResult<()>
where
    A: AccountReader,
    S: SessionWriter,
{
    let user = api
        .current_user()
        .await
        .map_err(|e| ServiceError::from_repository("load profile", e))?;
    ctx.refresh_user(user, store).map_err(|e| {
        log::error!("Failed to update session for user {}: {e}", ctx.user.id);
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Email;
    use crate::domain::user::{SubscriptionStatus, UserRole};
    use crate::repository::test::{TestRepository, sample_user};

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: Email::new("ana@example.com").unwrap(),
            password: password.to_string(),
        }
    }

    fn trialing_professional() -> TestRepository {
        TestRepository::default().with_account(
            sample_user(UserRole::Professional, SubscriptionStatus::None),
            "supersecret",
        )
    }

    #[actix_web::test]
    async fn login_persists_session() {
        let repo = trialing_professional();

        let ctx = login(credentials("supersecret"), &repo, &repo).await.unwrap();

        assert_eq!(repo.session_count(), 1);
        assert_eq!(ctx.tokens.access.as_str(), "access-7");
        let restored = AppContext::restore(&ctx.session_key, &repo).unwrap();
        assert_eq!(restored, Some(ctx));
    }

    #[actix_web::test]
    async fn wrong_password_is_a_form_error() {
        let repo = trialing_professional();

        let result = login(credentials("nope"), &repo, &repo).await;

        assert_eq!(
            result.unwrap_err(),
            ServiceError::Form(INVALID_CREDENTIALS.to_string())
        );
        assert_eq!(repo.session_count(), 0);
    }

    #[actix_web::test]
    async fn logout_removes_session() {
        let repo = trialing_professional();
        let ctx = login(credentials("supersecret"), &repo, &repo).await.unwrap();

        logout(ctx, &repo).unwrap();

        assert_eq!(repo.session_count(), 0);
    }

    #[actix_web::test]
    async fn sync_profile_picks_up_new_subscription() {
        let repo = trialing_professional();
        let mut ctx = login(credentials("supersecret"), &repo, &repo).await.unwrap();
        assert!(!ctx.current_user().can_manage_students);

        repo.set_current_user(sample_user(UserRole::Professional, SubscriptionStatus::Active));
        sync_profile(&mut ctx, &repo, &repo).await.unwrap();

        assert!(ctx.current_user().can_manage_students);
        let restored = AppContext::restore(&ctx.session_key, &repo).unwrap().unwrap();
        assert_eq!(restored.user.subscription_status, SubscriptionStatus::Active);
    }

    #[actix_web::test]
    async fn duplicate_registration_reports_email() {
        let repo = trialing_professional();
        let account = NewAccount {
            email: Email::new("ana@example.com").unwrap(),
            username: "ana2".into(),
            password: "supersecret".into(),
            password_confirm: "supersecret".into(),
            first_name: String::new(),
            last_name: String::new(),
            role: UserRole::User,
            full_name: String::new(),
            bio: String::new(),
            cref: String::new(),
        };

        let err = register(account, &repo, &repo).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(fields) if fields.contains_key("email")));
        assert_eq!(repo.session_count(), 0);
    }
}
