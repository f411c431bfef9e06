use serde::Serialize;

use crate::domain::capability::{Capability, can, has_active_subscription};
use crate::domain::user::{SubscriptionStatus, UserProfile};
use crate::repository::{CategoryReader, StudentReader, VideoReader};
use crate::services::categories::load_own_categories;

use super::{ServiceError, ServiceResult};

/// Summary shown on the professional landing page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfessionalOverview {
    pub category_count: usize,
    pub video_count: usize,
    /// `None` while student management is locked behind the subscription.
    pub student_count: Option<usize>,
    pub subscription_status: &'static str,
    pub has_active_subscription: bool,
}

fn status_label(user: &UserProfile) -> &'static str {
    match user.subscription_status {
        SubscriptionStatus::Active => "Ativa",
        SubscriptionStatus::Trialing => "Em avaliação",
        SubscriptionStatus::PastDue => "Pagamento pendente",
        SubscriptionStatus::Unpaid => "Não paga",
        SubscriptionStatus::Canceled => "Cancelada",
        SubscriptionStatus::None => "Sem assinatura",
    }
}

pub async fn show_professional<R>(user: &UserProfile, repo: &R) -> ServiceResult<ProfessionalOverview>
where
    R: CategoryReader + VideoReader + StudentReader,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let categories = load_own_categories(repo).await?;
    let videos = repo
        .list_my_videos(None)
        .await
        .map_err(|e| ServiceError::from_repository("list own videos", e))?;

    let student_count = if can(user, Capability::ManageStudents) {
        match repo.list_students().await {
            Ok(students) => Some(students.len()),
            Err(e) => return Err(ServiceError::from_repository("list students", e)),
        }
    } else {
        None
    };

    Ok(ProfessionalOverview {
        category_count: categories.as_slice().len(),
        video_count: videos.count,
        student_count,
        subscription_status: status_label(user),
        has_active_subscription: has_active_subscription(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;
    use crate::repository::test::{
        TestRepository, sample_category, sample_consumer, sample_professional, sample_user,
        sample_video,
    };

    #[actix_web::test]
    async fn counts_own_catalog() {
        let legs = sample_category(1, "Legs", None);
        let repo = TestRepository::new(
            vec![legs.clone(), sample_category(2, "Squat", Some(1))],
            vec![sample_video(10, "Squat basics", vec![legs])],
        );

        let overview = show_professional(&sample_professional(), &repo).await.unwrap();

        assert_eq!(overview.category_count, 2);
        assert_eq!(overview.video_count, 1);
        assert_eq!(overview.student_count, Some(0));
        assert_eq!(overview.subscription_status, "Ativa");
    }

    #[actix_web::test]
    async fn students_hidden_without_subscription() {
        let repo = TestRepository::new(vec![], vec![]);
        let user = sample_user(UserRole::Professional, SubscriptionStatus::Canceled);

        let overview = show_professional(&user, &repo).await.unwrap();

        assert_eq!(overview.student_count, None);
        assert!(!overview.has_active_subscription);
    }

    #[actix_web::test]
    async fn consumers_have_no_overview() {
        let repo = TestRepository::default();
        assert_eq!(
            show_professional(&sample_consumer(), &repo).await.unwrap_err(),
            ServiceError::Unauthorized
        );
    }
}
