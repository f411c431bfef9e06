use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::category::{Category, compare_display_names};
use crate::domain::collection::CategoryList;
use crate::domain::tree::{CategoryNode, build_category_tree};
use crate::repository::FieldErrors;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent: Option<i32>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            slug: value.slug.as_str().to_string(),
            description: value.description.clone(),
            parent: value.parent.map(|p| p.get()),
            display_name: value.display_name(),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryNodeDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub children: Vec<CategoryNodeDto>,
}

impl From<&CategoryNode> for CategoryNodeDto {
    fn from(value: &CategoryNode) -> Self {
        Self {
            category: CategoryDto::from(&value.category),
            children: value.children.iter().map(CategoryNodeDto::from).collect(),
        }
    }
}

/// Categories as `<select>` options, ordered by display name.
pub fn category_options(categories: &[Category]) -> Vec<CategoryDto> {
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|a, b| compare_display_names(a, b));
    sorted.into_iter().map(CategoryDto::from).collect()
}

/// Everything the category management page renders.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoriesView {
    pub tree: Vec<CategoryNodeDto>,
    /// Flat list ordered by display name.
    pub categories: Vec<CategoryDto>,
    /// Root categories a new category may be nested under.
    pub parent_options: Vec<CategoryDto>,
    pub errors: FieldErrors,
    pub notice: Option<String>,
}

impl CategoriesView {
    pub fn from_list(list: &CategoryList) -> Self {
        let categories = list.as_slice();
        let roots: Vec<Category> = categories.iter().filter(|c| c.is_root()).cloned().collect();
        Self {
            tree: build_category_tree(categories)
                .iter()
                .map(CategoryNodeDto::from)
                .collect(),
            categories: category_options(categories),
            parent_options: category_options(&roots),
            errors: FieldErrors::new(),
            notice: None,
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
