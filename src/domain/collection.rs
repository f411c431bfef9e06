//! Locally held lists updated in place after a successful backend mutation.
//!
//! The dashboard never re-fetches a whole collection after create, update or
//! delete. These helpers splice, map and filter the list it already holds by
//! identifier, so the view can drift from the backend if another session edits
//! the same records.

use std::collections::BTreeSet;

use crate::domain::category::{Category, resolve_parent_names, sort_by_display_name};
use crate::domain::types::{CategoryId, VideoId};
use crate::domain::video::Video;

/// Categories currently shown on a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryList(Vec<Category>);

impl CategoryList {
    /// Wrap a freshly fetched list, resolving display names.
    pub fn new(mut categories: Vec<Category>) -> Self {
        resolve_parent_names(&mut categories);
        Self(categories)
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Category> {
        self.0
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.0.iter().find(|c| c.id == id)
    }

    /// Add a created category and restore display-name order.
    pub fn insert(&mut self, category: Category) {
        self.0.retain(|c| c.id != category.id);
        self.0.push(category);
        resolve_parent_names(&mut self.0);
        sort_by_display_name(&mut self.0);
    }

    /// Swap in an updated category. Returns `false` if it was not listed.
    pub fn replace(&mut self, category: Category) -> bool {
        let Some(slot) = self.0.iter_mut().find(|c| c.id == category.id) else {
            return false;
        };
        *slot = category;
        resolve_parent_names(&mut self.0);
        true
    }

    /// Remove a category and every category whose parent it is.
    ///
    /// Returns the removed identifiers, starting with `id` itself. Nothing is
    /// removed when `id` is not listed.
    pub fn remove_cascade(&mut self, id: CategoryId) -> Vec<CategoryId> {
        if self.get(id).is_none() {
            return Vec::new();
        }

        let mut removed = vec![id];
        let mut cursor = 0;
        while cursor < removed.len() {
            let parent = removed[cursor];
            let children: Vec<CategoryId> = self
                .0
                .iter()
                .filter(|c| c.parent == Some(parent) && !removed.contains(&c.id))
                .map(|c| c.id)
                .collect();
            removed.extend(children);
            cursor += 1;
        }

        self.0.retain(|c| !removed.contains(&c.id));
        removed
    }
}

/// Videos currently shown on a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoList(Vec<Video>);

impl VideoList {
    pub fn new(videos: Vec<Video>) -> Self {
        Self(videos)
    }

    pub fn as_slice(&self) -> &[Video] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Video> {
        self.0
    }

    pub fn get(&self, id: VideoId) -> Option<&Video> {
        self.0.iter().find(|v| v.id == id)
    }

    /// Newly created videos go first, matching the backend's newest-first order.
    pub fn prepend(&mut self, video: Video) {
        self.0.retain(|v| v.id != video.id);
        self.0.insert(0, video);
    }

    /// Swap in an updated video. Returns `false` if it was not listed.
    pub fn replace(&mut self, video: Video) -> bool {
        match self.0.iter_mut().find(|v| v.id == video.id) {
            Some(slot) => {
                *slot = video;
                true
            }
            None => false,
        }
    }

    /// Drop a deleted video. Returns `false` if it was not listed.
    pub fn remove(&mut self, id: VideoId) -> bool {
        let before = self.0.len();
        self.0.retain(|v| v.id != id);
        self.0.len() != before
    }

    /// Strip deleted categories from every video's set. Videos are kept even
    /// when their set becomes empty.
    pub fn detach_categories(&mut self, ids: &[CategoryId]) {
        let ids: BTreeSet<CategoryId> = ids.iter().copied().collect();
        for video in &mut self.0 {
            video.categories.retain(|c| !ids.contains(&c.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryName, CategorySlug, VideoTitle};
    use chrono::DateTime;

    fn category(id: i32, name: &str, parent: Option<i32>) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            slug: CategorySlug::new(name.to_lowercase()).unwrap(),
            description: String::new(),
            parent: parent.map(|p| CategoryId::new(p).unwrap()),
            parent_name: None,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn video(id: i32, categories: Vec<Category>) -> Video {
        Video {
            id: VideoId::new(id).unwrap(),
            title: VideoTitle::new(format!("Video {id}")).unwrap(),
            description: String::new(),
            url: String::new(),
            thumbnail: None,
            categories,
            professional_name: "Coach".into(),
            can_edit: Some(true),
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn id(value: i32) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    #[test]
    fn insert_keeps_display_name_order() {
        let mut list = CategoryList::new(vec![category(1, "Legs", None)]);
        list.insert(category(2, "arms", None));
        list.insert(category(3, "Squat", Some(1)));

        let names: Vec<String> = list.as_slice().iter().map(Category::display_name).collect();
        assert_eq!(names, vec!["arms", "Legs", "Legs / Squat"]);
    }

    #[test]
    fn replace_refreshes_child_display_names() {
        let mut list = CategoryList::new(vec![category(1, "Legs", None), category(2, "Squat", Some(1))]);

        assert!(list.replace(category(1, "Lower body", None)));
        assert_eq!(list.get(id(2)).unwrap().display_name(), "Lower body / Squat");
        assert!(!list.replace(category(9, "Ghost", None)));
    }

    #[test]
    fn remove_cascade_drops_children() {
        let mut list = CategoryList::new(vec![
            category(1, "Legs", None),
            category(2, "Squat", Some(1)),
            category(3, "Arms", None),
        ]);

        let removed = list.remove_cascade(id(1));

        assert_eq!(removed, vec![id(1), id(2)]);
        assert_eq!(list.as_slice().len(), 1);
        assert_eq!(list.as_slice()[0].id, 3);
    }

    #[test]
    fn remove_cascade_of_unknown_id_is_noop() {
        let mut list = CategoryList::new(vec![category(1, "Legs", None)]);

        assert!(list.remove_cascade(id(5)).is_empty());
        assert_eq!(list.as_slice().len(), 1);
    }

    #[test]
    fn remove_cascade_survives_self_parent() {
        let mut list = CategoryList::new(vec![category(7, "Loop", Some(7))]);

        assert_eq!(list.remove_cascade(id(7)), vec![id(7)]);
        assert!(list.as_slice().is_empty());
    }

    #[test]
    fn detach_leaves_other_tags_and_keeps_video() {
        let legs = category(1, "Legs", None);
        let squat = category(2, "Squat", Some(1));
        let core = category(3, "Core", None);
        let mut videos = VideoList::new(vec![
            video(1, vec![legs.clone()]),
            video(2, vec![squat.clone(), core.clone()]),
        ]);

        videos.detach_categories(&[id(1), id(2)]);

        assert_eq!(videos.as_slice().len(), 2);
        assert!(videos.as_slice()[0].categories.is_empty());
        assert_eq!(videos.as_slice()[1].categories, vec![core]);
    }

    #[test]
    fn video_list_replace_and_remove_by_id() {
        let mut videos = VideoList::new(vec![video(1, vec![]), video(2, vec![])]);
        let mut edited = video(2, vec![]);
        edited.title = VideoTitle::new("Edited").unwrap();

        assert!(videos.replace(edited));
        assert_eq!(videos.get(VideoId::new(2).unwrap()).unwrap().title, "Edited");
        assert!(videos.remove(VideoId::new(1).unwrap()));
        assert!(!videos.remove(VideoId::new(1).unwrap()));
        videos.prepend(video(3, vec![]));
        assert_eq!(videos.as_slice()[0].id, 3);
    }
}
