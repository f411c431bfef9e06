use reqwest::Method;

use crate::domain::user::{AuthSession, Credentials, NewAccount, UserProfile};
use crate::repository::api::{ApiRepository, fetch};
use crate::repository::{AccountReader, AccountWriter, RepositoryResult};

impl AccountReader for ApiRepository {
    async fn current_user(&self) -> RepositoryResult<UserProfile> {
        fetch(self.request(Method::GET, "auth/me/")?).await
    }
}

impl AccountWriter for ApiRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<AuthSession> {
        fetch(self.request(Method::POST, "auth/login/")?.json(credentials)).await
    }

    async fn register(&self, account: &NewAccount) -> RepositoryResult<AuthSession> {
        fetch(self.request(Method::POST, "auth/register/")?.json(account)).await
    }
}
