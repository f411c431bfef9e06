use crate::domain::capability::{Capability, can};
use crate::domain::collection::{CategoryList, VideoList};
use crate::domain::page::Page;
use crate::domain::user::UserProfile;
use crate::domain::video::{CategorySelection, Video, VideoListQuery};
use crate::dto::categories::category_options;
use crate::dto::videos::{FeedView, MyVideosView, Pagination, VideoDto};
use crate::forms::videos::{DeleteVideoFormPayload, EditVideoFormPayload, UploadVideoFormPayload};
use crate::repository::{
    CategoryListQuery, CategoryReader, FieldErrors, MediaLocator, VideoReader, VideoWriter,
};
use crate::services::categories::load_own_categories;

use super::{ServiceError, ServiceResult};

const UNKNOWN_CATEGORY: &str = "Só é possível usar categorias que você criou.";

/// Every selected id must name one of the requester's own categories.
fn check_selection(list: &CategoryList, selection: &CategorySelection) -> Result<(), FieldErrors> {
    if selection.iter().all(|id| list.get(id).is_some()) {
        return Ok(());
    }
    let mut errors = FieldErrors::new();
    errors.insert("categories".to_string(), vec![UNKNOWN_CATEGORY.to_string()]);
    Err(errors)
}

fn my_videos_view<M>(
    videos: VideoList,
    page: &Page<Video>,
    current: usize,
    categories: &CategoryList,
    media: &M,
) -> MyVideosView
where
    M: MediaLocator,
{
    MyVideosView {
        videos: videos
            .as_slice()
            .iter()
            .map(|v| VideoDto::new(v, media))
            .collect(),
        categories: category_options(categories.as_slice()),
        pagination: Pagination::new(page, current),
        errors: FieldErrors::new(),
        notice: None,
    }
}

async fn load_my_videos<R>(repo: &R, page: Option<usize>) -> ServiceResult<Page<Video>>
where
    R: VideoReader,
{
    repo.list_my_videos(page)
        .await
        .map_err(|e| ServiceError::from_repository("list own videos", e))
}

/// Consumer-facing feed filtered by category slug and search term.
pub async fn show_feed<R>(
    user: &UserProfile,
    query: VideoListQuery,
    repo: &R,
) -> ServiceResult<FeedView>
where
    R: CategoryReader + VideoReader + MediaLocator,
{
    if !can(user, Capability::BrowseVideos) {
        return Err(ServiceError::Unauthorized);
    }

    let categories = match repo.list_categories(CategoryListQuery::all()).await {
        Ok(categories) => CategoryList::new(categories),
        Err(e) => return Err(ServiceError::from_repository("list categories", e)),
    };

    let page = match repo.list_videos(&query).await {
        Ok(page) => page,
        Err(e) => return Err(ServiceError::from_repository("list videos", e)),
    };

    Ok(FeedView {
        videos: page
            .results
            .iter()
            .map(|v| VideoDto::new(v, repo))
            .collect(),
        categories: category_options(categories.as_slice()),
        selected_slug: query.category_slug.clone().unwrap_or_default(),
        search: query.search.clone().unwrap_or_default(),
        pagination: Pagination::new(&page, query.page.unwrap_or(1)),
    })
}

pub async fn show_my_videos<R>(
    user: &UserProfile,
    page: Option<usize>,
    repo: &R,
) -> ServiceResult<MyVideosView>
where
    R: CategoryReader + VideoReader + MediaLocator,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let categories = load_own_categories(repo).await?;
    let videos = load_my_videos(repo, page).await?;
    let list = VideoList::new(videos.results.clone());
    Ok(my_videos_view(list, &videos, page.unwrap_or(1), &categories, repo))
}

/// Upload a file or register a URL; the new video is tagged with exactly
/// the submitted categories.
pub async fn upload_video<R>(
    payload: UploadVideoFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<MyVideosView>
where
    R: CategoryReader + VideoReader + VideoWriter + MediaLocator,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let categories = load_own_categories(repo).await?;
    let mut page = load_my_videos(repo, None).await?;
    let mut list = VideoList::new(std::mem::take(&mut page.results));

    if let Err(errors) = check_selection(&categories, &payload.categories) {
        return Ok(my_videos_view(list, &page, 1, &categories, repo).with_errors(errors));
    }

    match repo.create_video(&payload.into_new_video()).await {
        Ok(video) => {
            list.prepend(video);
            page.count += 1;
            Ok(my_videos_view(list, &page, 1, &categories, repo).with_notice("Vídeo enviado."))
        }
        Err(e) => {
            let errors = ServiceError::from_repository("create video", e).into_field_errors()?;
            Ok(my_videos_view(list, &page, 1, &categories, repo).with_errors(errors))
        }
    }
}

/// Replace title, description and the whole category set of a video.
pub async fn edit_video<R>(
    payload: EditVideoFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<MyVideosView>
where
    R: CategoryReader + VideoReader + VideoWriter + MediaLocator,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let current = payload.page.unwrap_or(1);
    let categories = load_own_categories(repo).await?;
    let mut page = load_my_videos(repo, payload.page).await?;
    let mut list = VideoList::new(std::mem::take(&mut page.results));

    if let Err(errors) = check_selection(&categories, &payload.categories) {
        return Ok(my_videos_view(list, &page, current, &categories, repo).with_errors(errors));
    }

    match repo.update_video(payload.video_id, &payload.to_patch()).await {
        Ok(video) => {
            list.replace(video);
            Ok(my_videos_view(list, &page, current, &categories, repo)
                .with_notice("Vídeo atualizado."))
        }
        Err(e) => {
            let errors = ServiceError::from_repository("update video", e).into_field_errors()?;
            Ok(my_videos_view(list, &page, current, &categories, repo).with_errors(errors))
        }
    }
}

pub async fn delete_video<R>(
    payload: DeleteVideoFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<MyVideosView>
where
    R: CategoryReader + VideoReader + VideoWriter + MediaLocator,
{
    if !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let current = payload.page.unwrap_or(1);
    let categories = load_own_categories(repo).await?;
    let mut page = load_my_videos(repo, payload.page).await?;
    let mut list = VideoList::new(std::mem::take(&mut page.results));

    match repo.delete_video(payload.video_id).await {
        Ok(()) => {
            if list.remove(payload.video_id) {
                page.count = page.count.saturating_sub(1);
            }
            Ok(my_videos_view(list, &page, current, &categories, repo)
                .with_notice("Vídeo excluído."))
        }
        Err(e) => Err(ServiceError::from_repository("delete video", e)),
    }
}
