use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::page::Page;
use crate::domain::video::Video;
use crate::dto::categories::CategoryDto;
use crate::repository::{FieldErrors, MediaLocator};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Playable URL, resolved against the backend origin.
    pub url: String,
    pub thumbnail: Option<String>,
    pub categories: Vec<CategoryDto>,
    pub category_ids: Vec<i32>,
    pub professional_name: String,
    pub can_edit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoDto {
    pub fn new<M: MediaLocator + ?Sized>(video: &Video, media: &M) -> Self {
        Self {
            id: video.id.get(),
            title: video.title.as_str().to_string(),
            description: video.description.clone(),
            url: media.media_url(&video.url),
            thumbnail: video
                .thumbnail
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| media.media_url(t)),
            categories: video.categories.iter().map(CategoryDto::from).collect(),
            category_ids: video.category_ids().iter().map(|id| id.get()).collect(),
            professional_name: video.professional_name.clone(),
            can_edit: video.can_edit.unwrap_or(false),
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

/// Position within a paginated listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub page: usize,
    pub total_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    pub fn new<T>(page: &Page<T>, current: usize) -> Self {
        let current = current.max(1);
        Self {
            page: current,
            total_pages: page.total_pages(),
            count: page.count,
            has_next: page.next.is_some(),
            has_previous: page.previous.is_some() || current > 1,
        }
    }
}

/// Consumer feed page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedView {
    pub videos: Vec<VideoDto>,
    /// Category selector entries, ordered by display name.
    pub categories: Vec<CategoryDto>,
    pub selected_slug: String,
    pub search: String,
    pub pagination: Pagination,
}

/// Professional's own videos with the forms to manage them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MyVideosView {
    pub videos: Vec<VideoDto>,
    /// Own categories offered as tags, ordered by display name.
    pub categories: Vec<CategoryDto>,
    pub pagination: Pagination,
    pub errors: FieldErrors,
    pub notice: Option<String>,
}

impl MyVideosView {
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
