use reqwest::Method;

use crate::domain::category::{Category, CategoryPatch, NewCategory};
use crate::domain::types::CategoryId;
use crate::repository::api::{ApiRepository, ListBody, execute, fetch};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryScope, CategoryWriter, RepositoryResult,
};

impl CategoryReader for ApiRepository {
    async fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        let mut request = self.request(Method::GET, "categories/")?;
        if query.scope == CategoryScope::Mine {
            request = request.query(&[("mine", "true")]);
        }
        let body: ListBody<Category> = fetch(request).await?;
        Ok(body.into_page().results)
    }
}

impl CategoryWriter for ApiRepository {
    async fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let request = self.request(Method::POST, "categories/")?.json(category);
        fetch(request).await
    }

    async fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> RepositoryResult<Category> {
        let request = self
            .request(Method::PATCH, &format!("categories/{id}/"))?
            .json(patch);
        fetch(request).await
    }

    async fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        execute(self.request(Method::DELETE, &format!("categories/{id}/"))?).await
    }
}
