//! Two-level category forest built from the flat list the backend returns.

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;

/// A category together with its direct children.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    fn leaf(category: &Category) -> Self {
        Self {
            category: category.clone(),
            children: Vec::new(),
        }
    }
}

fn is_resolvable(parent: Option<CategoryId>, categories: &[Category]) -> bool {
    parent.is_some_and(|parent| categories.iter().any(|c| c.id == parent))
}

fn children_of<'a>(
    id: CategoryId,
    categories: &'a [Category],
) -> impl Iterator<Item = &'a Category> + 'a {
    categories.iter().filter(move |c| c.parent == Some(id))
}

/// Build the category forest.
///
/// Roots are the categories whose parent is absent or not present in
/// `categories`; they keep the input order. Each root lists its direct
/// children, and each child lists its own children one level further down.
/// Nothing deeper is computed.
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryNode> {
    categories
        .iter()
        .filter(|c| !is_resolvable(c.parent, categories))
        .map(|root| CategoryNode {
            category: root.clone(),
            children: children_of(root.id, categories)
                .map(|child| CategoryNode {
                    category: child.clone(),
                    children: children_of(child.id, categories)
                        .map(CategoryNode::leaf)
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Categories that declare themselves as their own parent.
///
/// The forest builder accepts them silently; they never surface as roots.
pub fn self_parented(categories: &[Category]) -> Vec<CategoryId> {
    categories
        .iter()
        .filter(|c| c.parent == Some(c.id))
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::resolve_parent_names;
    use crate::domain::types::{CategoryName, CategorySlug};
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

    fn root_ids(forest: &[CategoryNode]) -> Vec<i32> {
        forest.iter().map(|n| n.category.id.get()).collect()
    }

    #[test]
    fn legs_and_squat_form_one_root_with_one_child() {
        let mut categories = vec![category(1, "Legs", None), category(2, "Squat", Some(1))];
        resolve_parent_names(&mut categories);

        let forest = build_category_tree(&categories);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].category.name, "Legs");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].category.name, "Squat");
        assert_eq!(forest[0].children[0].category.display_name(), "Legs / Squat");
    }

    #[test]
    fn root_order_follows_input_order() {
        let categories = vec![
            category(3, "Core", None),
            category(1, "Arms", None),
            category(2, "Legs", None),
        ];

        assert_eq!(root_ids(&build_category_tree(&categories)), vec![3, 1, 2]);
    }

    #[test]
    fn unresolvable_parent_is_treated_as_root() {
        let categories = vec![category(1, "Legs", None), category(5, "Lunge", Some(42))];

        let forest = build_category_tree(&categories);

        assert_eq!(root_ids(&forest), vec![1, 5]);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn every_resolvable_category_appears_once_under_its_parent() {
        let categories = vec![
            category(1, "Legs", None),
            category(2, "Squat", Some(1)),
            category(3, "Arms", None),
            category(4, "Lunge", Some(1)),
            category(5, "Curl", Some(3)),
        ];

        let forest = build_category_tree(&categories);

        assert_eq!(root_ids(&forest), vec![1, 3]);
        for c in categories.iter().filter(|c| c.parent.is_some()) {
            let appearances = forest
                .iter()
                .flat_map(|n| n.children.iter())
                .filter(|child| child.category.id == c.id)
                .count();
            assert_eq!(appearances, 1);
            let holder = forest
                .iter()
                .find(|n| n.children.iter().any(|child| child.category.id == c.id))
                .unwrap();
            assert_eq!(Some(holder.category.id), c.parent);
        }
    }

    #[test]
    fn grandchildren_are_computed_one_level_deeper() {
        let categories = vec![
            category(1, "Legs", None),
            category(2, "Squat", Some(1)),
            category(3, "Front squat", Some(2)),
        ];

        let forest = build_category_tree(&categories);

        assert_eq!(forest.len(), 1);
        let child = &forest[0].children[0];
        assert_eq!(child.children.len(), 1);
        assert_eq!(child.children[0].category.id, 3);
        assert!(child.children[0].children.is_empty());
    }

    #[test]
    fn self_parented_category_is_reported_and_not_a_root() {
        let categories = vec![category(1, "Legs", None), category(7, "Loop", Some(7))];

        assert_eq!(root_ids(&build_category_tree(&categories)), vec![1]);
        assert_eq!(self_parented(&categories), vec![CategoryId::new(7).unwrap()]);
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build_category_tree(&[]).is_empty());
    }
}
