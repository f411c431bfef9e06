use serde::Deserialize;
use validator::Validate;

use crate::domain::category::{CategoryPatch, NewCategory};
use crate::domain::types::{CategoryId, CategoryName};
use crate::forms::optional_category_id;

form_error!(CategoryFormError, "Category");

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 100, message = "Informe um nome de até 100 caracteres."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw `<select>` value; blank for a root category.
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    pub description: String,
    pub parent: Option<CategoryId>,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name,
            description: self.description,
            parent: self.parent,
        }
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            description: value.description.trim().to_string(),
            parent: optional_category_id(value.parent.as_deref())?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    /// Taken from the route path when absent from the body.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = 100, message = "Informe um nome de até 100 caracteres."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub category_id: CategoryId,
    pub name: CategoryName,
    pub description: String,
    pub parent: Option<CategoryId>,
}

impl UpdateCategoryFormPayload {
    pub fn to_patch(&self) -> CategoryPatch {
        CategoryPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            parent: self.parent,
        }
    }
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
            name: CategoryName::new(value.name)?,
            description: value.description.trim().to_string(),
            parent: optional_category_id(value.parent.as_deref())?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteCategoryForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
}

impl TryFrom<DeleteCategoryForm> for DeleteCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: DeleteCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_trims_and_parses_parent() {
        let form = AddCategoryForm {
            name: "  Squat ".into(),
            description: " Lower body ".into(),
            parent: Some("1".into()),
        };

        let payload = AddCategoryFormPayload::try_from(form).unwrap();

        assert_eq!(payload.name.as_str(), "Squat");
        assert_eq!(payload.description, "Lower body");
        assert_eq!(payload.parent, Some(CategoryId::new(1).unwrap()));
    }

    #[test]
    fn add_form_rejects_blank_name_on_name_field() {
        let form = AddCategoryForm {
            name: "   ".into(),
            description: String::new(),
            parent: None,
        };

        let fields = AddCategoryFormPayload::try_from(form)
            .unwrap_err()
            .into_fields();

        assert!(fields.contains_key("name"));
    }

    #[test]
    fn update_form_accepts_blank_parent() {
        let form = UpdateCategoryForm {
            category_id: 2,
            name: "Squat".into(),
            description: String::new(),
            parent: Some(String::new()),
        };

        let payload = UpdateCategoryFormPayload::try_from(form).unwrap();

        assert_eq!(payload.parent, None);
        assert_eq!(payload.to_patch().parent, None);
    }

    #[test]
    fn delete_form_requires_positive_id() {
        let form = DeleteCategoryForm { category_id: 0 };
        assert!(DeleteCategoryFormPayload::try_from(form).is_err());
    }
}
