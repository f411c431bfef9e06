use serde::Deserialize;

use crate::domain::capability::{Capability, can};
use crate::domain::collection::CategoryList;
use crate::domain::page::Page;
use crate::domain::tree::build_category_tree;
use crate::domain::user::UserProfile;
use crate::domain::video::VideoListQuery;
use crate::dto::categories::CategoryNodeDto;
use crate::dto::videos::VideoDto;
use crate::repository::{CategoryListQuery, CategoryReader, MediaLocator, VideoReader};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the `api_v1_categories_tree` endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ApiV1CategoryTreeParams {
    /// Only the requester's own categories.
    #[serde(default)]
    pub mine: bool,
}

/// Query parameters accepted by the `api_v1_videos` endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ApiV1VideosParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl From<ApiV1VideosParams> for VideoListQuery {
    fn from(value: ApiV1VideosParams) -> Self {
        VideoListQuery {
            category_slug: value.category,
            search: value.search,
            page: value.page,
        }
    }
}

/// Category forest for client-side pickers.
pub async fn api_v1_categories_tree<R>(
    params: ApiV1CategoryTreeParams,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<Vec<CategoryNodeDto>>
where
    R: CategoryReader,
{
    if !can(user, Capability::BrowseVideos) {
        return Err(ServiceError::Unauthorized);
    }
    if params.mine && !can(user, Capability::ManageCatalog) {
        return Err(ServiceError::Unauthorized);
    }

    let query = if params.mine {
        CategoryListQuery::mine()
    } else {
        CategoryListQuery::all()
    };
    let categories = repo
        .list_categories(query)
        .await
        .map_err(|e| ServiceError::from_repository("list categories", e))?;
    let list = CategoryList::new(categories);

    Ok(build_category_tree(list.as_slice())
        .iter()
        .map(CategoryNodeDto::from)
        .collect())
}

pub async fn api_v1_videos<R>(
    params: ApiV1VideosParams,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<Page<VideoDto>>
where
    R: VideoReader + MediaLocator,
{
    if !can(user, Capability::BrowseVideos) {
        return Err(ServiceError::Unauthorized);
    }

    let query = VideoListQuery::from(params);
    match repo.list_videos(&query).await {
        Ok(page) => Ok(page.map(|video| VideoDto::new(&video, repo))),
        Err(e) => Err(ServiceError::from_repository("list videos", e)),
    }
}
