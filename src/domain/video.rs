use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, VideoId, VideoTitle, VideoUrl};

/// Exact set of category identifiers attached to a video.
///
/// Duplicates collapse; order is irrelevant. Submitting a selection always
/// replaces the previous set of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySelection(BTreeSet<CategoryId>);

impl CategorySelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CategoryId> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where a new video's playable content comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// A file received by the dashboard, forwarded to the backend as multipart.
    Upload(UploadedVideo),
    /// A URL supplied by the professional.
    External(VideoUrl),
}

/// Uploaded file staged on local disk until it is forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedVideo {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Video as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub title: VideoTitle,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub professional_name: String,
    /// Set by the backend when the requester owns the video.
    #[serde(default)]
    pub can_edit: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Category>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire form of a video that also accepts the older single `category` field.
#[derive(Debug, Deserialize)]
pub struct VideoRecord {
    #[serde(flatten)]
    pub video: Video,
    #[serde(default)]
    pub category: Option<Category>,
}

impl From<VideoRecord> for Video {
    fn from(record: VideoRecord) -> Self {
        let mut video = record.video;
        if let Some(category) = record.category {
            if !video.categories.iter().any(|c| c.id == category.id) {
                video.categories.push(category);
            }
        }
        video
    }
}

impl Video {
    /// Identifiers of the categories this video is tagged with.
    pub fn category_ids(&self) -> CategorySelection {
        self.categories.iter().map(|c| c.id).collect()
    }

    /// Whether the video is tagged directly with the category carrying `slug`.
    ///
    /// Parents and children of that category are not considered.
    pub fn has_category_slug(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug.as_str() == slug)
    }

    /// Case-insensitive match of `term` against title and description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Data required to create a new [`Video`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub title: VideoTitle,
    pub description: String,
    pub source: VideoSource,
    pub categories: CategorySelection,
}

/// Editable fields of a [`Video`]. The source is immutable after creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoPatch {
    pub title: VideoTitle,
    pub description: String,
    pub categories: CategorySelection,
}

/// Filters for the consumer-facing video feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoListQuery {
    pub category_slug: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl VideoListQuery {
    pub fn category_slug(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Query-string pairs for the backend, skipping blank filters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(slug) = self.category_slug.as_deref().map(str::trim) {
            if !slug.is_empty() {
                pairs.push(("category_slug", slug.to_string()));
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        if let Some(page) = self.page.filter(|p| *p > 1) {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }

    /// Apply the filters to an in-memory list, as the backend does.
    pub fn matches(&self, video: &Video) -> bool {
        let slug_ok = match self.category_slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => video.has_category_slug(slug),
            _ => true,
        };
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|term| video.matches_search(term));
        slug_ok && search_ok
    }
}
