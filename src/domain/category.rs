use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, CategorySlug};

/// Separator placed between parent and child names in display names.
pub const DISPLAY_NAME_SEPARATOR: &str = " / ";

/// Category owned by a professional, as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: CategorySlug,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Name of the parent category, when the backend resolved it.
    #[serde(default)]
    pub parent_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Returns `true` when the category has no declared parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Label used in flat selectors: `"Parent / Child"` for children, the
    /// bare name for roots.
    pub fn display_name(&self) -> String {
        match (&self.parent, &self.parent_name) {
            (Some(_), Some(parent_name)) => {
                format!("{parent_name}{DISPLAY_NAME_SEPARATOR}{}", self.name)
            }
            _ => self.name.as_str().to_string(),
        }
    }
}

/// Fill in `parent_name` for categories whose parent is present in `categories`.
///
/// Parents that cannot be found leave the name untouched, so an orphan keeps
/// whatever the backend sent (usually nothing) and displays as a root.
pub fn resolve_parent_names(categories: &mut [Category]) {
    let names: Vec<(CategoryId, String)> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str().to_string()))
        .collect();

    for category in categories.iter_mut() {
        let Some(parent) = category.parent else {
            category.parent_name = None;
            continue;
        };
        if let Some((_, name)) = names.iter().find(|(id, _)| *id == parent) {
            category.parent_name = Some(name.clone());
        }
    }
}

/// Case-insensitive comparison of display names.
pub fn compare_display_names(a: &Category, b: &Category) -> Ordering {
    a.display_name()
        .to_lowercase()
        .cmp(&b.display_name().to_lowercase())
}

/// Sort categories by display name, ignoring case. The sort is stable.
pub fn sort_by_display_name(categories: &mut [Category]) {
    categories.sort_by(compare_display_names);
}

/// Data required to create a new [`Category`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<CategoryId>,
}

/// Full set of editable fields sent when updating a [`Category`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryPatch {
    pub name: CategoryName,
    pub description: String,
    pub parent: Option<CategoryId>,
}
