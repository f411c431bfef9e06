use reqwest::Method;

use crate::domain::billing::{CheckoutSession, PortalSession};
use crate::repository::api::{ApiRepository, fetch};
use crate::repository::{BillingWriter, RepositoryResult};

impl BillingWriter for ApiRepository {
    async fn create_checkout(&self) -> RepositoryResult<CheckoutSession> {
        fetch(self.request(Method::POST, "auth/stripe/checkout/")?).await
    }

    async fn create_portal(&self) -> RepositoryResult<PortalSession> {
        fetch(self.request(Method::POST, "auth/stripe/portal/")?).await
    }
}
