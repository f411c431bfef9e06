use crate::domain::capability::{Capability, can};
use crate::domain::types::RedirectUrl;
use crate::domain::user::UserProfile;
use crate::repository::BillingWriter;

use super::{ServiceError, ServiceResult};

/// Hosted checkout page for starting the professional subscription.
pub async fn start_checkout<R>(user: &UserProfile, repo: &R) -> ServiceResult<RedirectUrl>
where
    R: BillingWriter,
{
    if !can(user, Capability::Subscribe) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.create_checkout().await {
        Ok(session) => {
            log::info!(
                "Checkout session {} created for user {}",
                session.session_id.as_deref().unwrap_or("-"),
                user.id
            );
            Ok(session.checkout_url)
        }
        Err(e) => Err(ServiceError::from_repository("create checkout session", e)),
    }
}

/// Hosted customer portal for managing an existing subscription.
pub async fn open_portal<R>(user: &UserProfile, repo: &R) -> ServiceResult<RedirectUrl>
where
    R: BillingWriter,
{
    if !can(user, Capability::ManageBilling) {
        return Err(ServiceError::Unauthorized);
    }

    repo.create_portal()
        .await
        .map(|session| session.portal_url)
        .map_err(|e| ServiceError::from_repository("create portal session", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{SubscriptionStatus, UserRole};
    use crate::repository::test::{TestRepository, sample_consumer, sample_professional, sample_user};

    #[actix_web::test]
    async fn professional_gets_checkout_url() {
        let repo = TestRepository::default();
        let url = start_checkout(&sample_professional(), &repo).await.unwrap();
        assert_eq!(url.as_str(), "https://checkout.example.com/c/session-1");
    }

    #[actix_web::test]
    async fn admins_do_not_subscribe() {
        let repo = TestRepository::default();
        let admin = sample_user(UserRole::Admin, SubscriptionStatus::None);
        assert_eq!(
            start_checkout(&admin, &repo).await.unwrap_err(),
            ServiceError::Unauthorized
        );
        assert!(open_portal(&admin, &repo).await.is_ok());
    }

    #[actix_web::test]
    async fn consumers_have_no_portal() {
        let repo = TestRepository::default();
        assert_eq!(
            open_portal(&sample_consumer(), &repo).await.unwrap_err(),
            ServiceError::Unauthorized
        );
    }

    #[actix_web::test]
    async fn offline_checkout_is_a_connection_error() {
        let repo = TestRepository::default();
        repo.set_offline(true);
        assert_eq!(
            start_checkout(&sample_professional(), &repo).await.unwrap_err(),
            ServiceError::Connection
        );
    }
}
