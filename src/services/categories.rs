use crate::domain::capability::{Capability, can};
use crate::domain::collection::CategoryList;
use crate::domain::tree::self_parented;
use crate::domain::types::CategoryId;
use crate::domain::user::UserProfile;
use crate::dto::categories::CategoriesView;
use crate::forms::categories::{
    AddCategoryFormPayload, DeleteCategoryFormPayload, UpdateCategoryFormPayload,
};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, FieldErrors};

use super::{ServiceError, ServiceResult};

const PARENT_UNKNOWN: &str = "Categoria pai inválida.";
const PARENT_NOT_ROOT: &str = "Subcategorias não podem ter subcategorias.";
const PARENT_IS_SELF: &str = "Uma categoria não pode ser pai de si mesma.";
const HAS_CHILDREN: &str = "Categorias com subcategorias não podem virar subcategorias.";

/// Fetch the requester's own categories.
pub(crate) async fn load_own_categories<R>(repo: &R) -> ServiceResult<CategoryList>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryListQuery::mine()).await {
        Ok(categories) => {
            let list = CategoryList::new(categories);
            let malformed = self_parented(list.as_slice());
            if !malformed.is_empty() {
                log::warn!("Categories declaring themselves as parent: {malformed:?}");
            }
            Ok(list)
        }
        Err(e) => Err(ServiceError::from_repository("list categories", e)),
    }
}

/// Keep the forest at depth two: a parent must be an own root category, and
/// a category that already has children cannot be nested.
fn check_parent(
    list: &CategoryList,
    parent: Option<CategoryId>,
    editing: Option<CategoryId>,
) -> Result<(), FieldErrors> {
    let Some(parent_id) = parent else {
        return Ok(());
    };

    let message = if editing == Some(parent_id) {
        Some(PARENT_IS_SELF)
    } else {
        match list.get(parent_id) {
            None => Some(PARENT_UNKNOWN),
            Some(parent) if !parent.is_root() => Some(PARENT_NOT_ROOT),
            Some(_) => editing
                .filter(|id| list.as_slice().iter().any(|c| c.parent == Some(*id)))
                .map(|_| HAS_CHILDREN),
        }
    };

    match message {
        None => Ok(()),
        Some(message) => {
            let mut errors = FieldErrors::new();
            errors.insert("parent".to_string(), vec![message.to_string()]);
            Err(errors)
        }
    }
}

pub async fn show_categories<R>(user: &UserProfile, repo: &R) -> ServiceResult<CategoriesView>
where
    R: CategoryReader,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let list = load_own_categories(repo).await?;
    Ok(CategoriesView::from_list(&list))
}

pub async fn add_category<R>(
    payload: AddCategoryFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<CategoriesView>
where
    R: CategoryReader + CategoryWriter,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let mut list = load_own_categories(repo).await?;
    if let Err(errors) = check_parent(&list, payload.parent, None) {
        return Ok(CategoriesView::from_list(&list).with_errors(errors));
    }

    match repo.create_category(&payload.into_new_category()).await {
        Ok(category) => {
            list.insert(category);
            Ok(CategoriesView::from_list(&list).with_notice("Categoria criada."))
        }
        Err(e) => {
            let errors = ServiceError::from_repository("create category", e).into_field_errors()?;
            Ok(CategoriesView::from_list(&list).with_errors(errors))
        }
    }
}

pub async fn update_category<R>(
    payload: UpdateCategoryFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<CategoriesView>
where
    R: CategoryReader + CategoryWriter,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let mut list = load_own_categories(repo).await?;
    if list.get(payload.category_id).is_none() {
        return Err(ServiceError::NotFound);
    }
    if let Err(errors) = check_parent(&list, payload.parent, Some(payload.category_id)) {
        return Ok(CategoriesView::from_list(&list).with_errors(errors));
    }

    match repo
        .update_category(payload.category_id, &payload.to_patch())
        .await
    {
        Ok(category) => {
            list.replace(category);
            Ok(CategoriesView::from_list(&list).with_notice("Categoria atualizada."))
        }
        Err(e) => {
            let errors = ServiceError::from_repository("update category", e).into_field_errors()?;
            Ok(CategoriesView::from_list(&list).with_errors(errors))
        }
    }
}

/// Delete a category. The backend also deletes its children and detaches it
/// from every video; the local list mirrors the category part.
pub async fn delete_category<R>(
    payload: DeleteCategoryFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<CategoriesView>
where
    R: CategoryReader + CategoryWriter,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let mut list = load_own_categories(repo).await?;
    if list.get(payload.category_id).is_none() {
        return Err(ServiceError::NotFound);
    }

    match repo.delete_category(payload.category_id).await {
        Ok(()) => {
            let removed = list.remove_cascade(payload.category_id);
            let notice = match removed.len() {
                0 | 1 => "Categoria excluída.".to_string(),
                n => format!("Categoria e {} subcategorias excluídas.", n - 1),
            };
            Ok(CategoriesView::from_list(&list).with_notice(notice))
        }
        Err(e) => Err(ServiceError::from_repository("delete category", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CategoryName;
    use crate::repository::test::{
        TestRepository, sample_category, sample_consumer, sample_professional, sample_video,
    };

    fn legs_and_squat() -> TestRepository {
        TestRepository::new(
            vec![
                sample_category(1, "Legs", None),
                sample_category(2, "Squat", Some(1)),
            ],
            vec![],
        )
    }

    fn add_payload(name: &str, parent: Option<i32>) -> AddCategoryFormPayload {
        AddCategoryFormPayload {
            name: CategoryName::new(name).unwrap(),
            description: String::new(),
            parent: parent.map(|p| CategoryId::new(p).unwrap()),
        }
    }

    fn update_payload(id: i32, name: &str, parent: Option<i32>) -> UpdateCategoryFormPayload {
        UpdateCategoryFormPayload {
            category_id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            description: String::new(),
            parent: parent.map(|p| CategoryId::new(p).unwrap()),
        }
    }

    fn delete_payload(id: i32) -> DeleteCategoryFormPayload {
        DeleteCategoryFormPayload {
            category_id: CategoryId::new(id).unwrap(),
        }
    }

    #[actix_web::test]
    async fn consumers_cannot_manage_categories() {
        let repo = legs_and_squat();
        let result = show_categories(&sample_consumer(), &repo).await;
        assert_eq!(result.unwrap_err(), ServiceError::Unauthorized);
    }

    #[actix_web::test]
    async fn show_builds_two_level_tree() {
        let repo = legs_and_squat();

        let view = show_categories(&sample_professional(), &repo).await.unwrap();

        assert_eq!(view.tree.len(), 1);
        assert_eq!(view.tree[0].category.name, "Legs");
        assert_eq!(view.tree[0].children.len(), 1);
        assert_eq!(view.tree[0].children[0].category.display_name, "Legs / Squat");
        assert_eq!(view.parent_options.len(), 1);
    }

    #[actix_web::test]
    async fn add_inserts_in_display_name_order() {
        let repo = legs_and_squat();

        let view = add_category(add_payload("arms", None), &sample_professional(), &repo)
            .await
            .unwrap();

        let names: Vec<&str> = view
            .categories
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["arms", "Legs", "Legs / Squat"]);
        assert_eq!(view.tree[0].category.name, "arms");
        assert_eq!(view.notice.as_deref(), Some("Categoria criada."));
        assert_eq!(repo.categories().len(), 3);
    }

    #[actix_web::test]
    async fn add_under_child_is_rejected_before_request() {
        let repo = legs_and_squat();

        let view = add_category(add_payload("Goblet", Some(2)), &sample_professional(), &repo)
            .await
            .unwrap();

        assert_eq!(view.errors["parent"], vec![PARENT_NOT_ROOT.to_string()]);
        assert_eq!(repo.categories().len(), 2);
    }

    #[actix_web::test]
    async fn foreign_parent_is_unknown() {
        let repo = TestRepository::new(vec![sample_category(5, "Yoga", None)], vec![])
            .with_foreign_categories(&[5]);

        let view = add_category(add_payload("Flow", Some(5)), &sample_professional(), &repo)
            .await
            .unwrap();

        assert_eq!(view.errors["parent"], vec![PARENT_UNKNOWN.to_string()]);
    }

    #[actix_web::test]
    async fn update_cannot_nest_category_with_children() {
        let repo = TestRepository::new(
            vec![
                sample_category(1, "Legs", None),
                sample_category(2, "Squat", Some(1)),
                sample_category(3, "Arms", None),
            ],
            vec![],
        );

        let payload = update_payload(1, "Legs", Some(3));
        let view = update_category(payload, &sample_professional(), &repo)
            .await
            .unwrap();

        assert_eq!(view.errors["parent"], vec![HAS_CHILDREN.to_string()]);
    }

    #[actix_web::test]
    async fn update_cannot_parent_itself() {
        let repo = legs_and_squat();

        let payload = update_payload(1, "Legs", Some(1));
        let view = update_category(payload, &sample_professional(), &repo)
            .await
            .unwrap();

        assert_eq!(view.errors["parent"], vec![PARENT_IS_SELF.to_string()]);
    }

    #[actix_web::test]
    async fn update_refreshes_child_display_names() {
        let repo = legs_and_squat();

        let payload = update_payload(1, "Lower body", None);
        let view = update_category(payload, &sample_professional(), &repo)
            .await
            .unwrap();

        let child = &view.tree[0].children[0].category;
        assert_eq!(child.display_name, "Lower body / Squat");
    }

    #[actix_web::test]
    async fn update_of_unlisted_category_is_not_found() {
        let repo = legs_and_squat();
        let result =
            update_category(update_payload(42, "Nope", None), &sample_professional(), &repo).await;
        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
    }

    #[actix_web::test]
    async fn delete_cascades_to_children_and_video_tags() {
        let legs = sample_category(1, "Legs", None);
        let squat = sample_category(2, "Squat", Some(1));
        let arms = sample_category(3, "Arms", None);
        let repo = TestRepository::new(
            vec![legs.clone(), squat.clone(), arms.clone()],
            vec![
                sample_video(10, "Leg day", vec![legs.clone()]),
                sample_video(11, "Full body", vec![legs, arms.clone()]),
                sample_video(12, "Goblet squat", vec![squat]),
            ],
        );

        let view = delete_category(delete_payload(1), &sample_professional(), &repo)
            .await
            .unwrap();

        assert_eq!(view.tree.len(), 1);
        assert_eq!(view.tree[0].category.name, "Arms");
        assert_eq!(
            view.notice.as_deref(),
            Some("Categoria e 1 subcategorias excluídas.")
        );

        assert!(repo.video(10).unwrap().categories.is_empty());
        assert_eq!(repo.video(11).unwrap().categories, vec![arms]);
        assert!(repo.video(12).unwrap().categories.is_empty());
        assert_eq!(repo.videos().len(), 3);
    }

    #[actix_web::test]
    async fn delete_of_foreign_category_is_not_found() {
        let repo = legs_and_squat().with_foreign_categories(&[1]);
        let result = delete_category(delete_payload(1), &sample_professional(), &repo).await;
        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
        assert_eq!(repo.categories().len(), 2);
    }

    #[actix_web::test]
    async fn unreachable_backend_is_a_connection_error() {
        let repo = legs_and_squat();
        repo.set_offline(true);
        let result = show_categories(&sample_professional(), &repo).await;
        assert_eq!(result.unwrap_err(), ServiceError::Connection);
    }
}
