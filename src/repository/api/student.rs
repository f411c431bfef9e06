use reqwest::Method;

use crate::domain::student::{LinkedStudent, NewStudentLink};
use crate::domain::types::StudentLinkId;
use crate::repository::api::{ApiRepository, ListBody, execute, fetch};
use crate::repository::{RepositoryResult, StudentReader, StudentWriter};

impl StudentReader for ApiRepository {
    async fn list_students(&self) -> RepositoryResult<Vec<LinkedStudent>> {
        let body: ListBody<LinkedStudent> =
            fetch(self.request(Method::GET, "auth/students/")?).await?;
        Ok(body.into_page().results)
    }
}

impl StudentWriter for ApiRepository {
    async fn add_student(&self, link: &NewStudentLink) -> RepositoryResult<LinkedStudent> {
        fetch(self.request(Method::POST, "auth/students/")?.json(link)).await
    }

    async fn remove_student(&self, id: StudentLinkId) -> RepositoryResult<()> {
        execute(self.request(Method::DELETE, &format!("auth/students/{id}/"))?).await
    }
}
