use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::ownership;
use super::pagination::{Page, PageRequest};
use super::validation;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Category, CategoryWithCount};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub color: Option<Option<String>>,
}

pub struct CategoryService {
    store: Arc<dyn Store>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner_id: &str, input: CreateCategory) -> Result<CategoryWithCount> {
        let name = validation::normalize_category_name(&input.name)?;
        validation::validate_description(input.description.as_deref())?;
        validation::validate_color(input.color.as_deref())?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            name,
            description: input.description,
            color: input.color,
            created_at: now,
            updated_at: now,
        };

        self.store.create_category(&category)?;
        tracing::debug!(category_id = %category.id, owner_id, name = %category.name, "created category");

        Ok(CategoryWithCount {
            category,
            bookmark_count: 0,
        })
    }

    pub fn get(&self, owner_id: &str, id: &str) -> Result<CategoryWithCount> {
        ownership::owned_category(self.store.as_ref(), owner_id, id)
    }

    pub fn list(
        &self,
        owner_id: &str,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<CategoryWithCount>> {
        let total = self.store.count_categories(owner_id, search)?;
        let items = self
            .store
            .list_categories(owner_id, search, page.limit(), page.offset())?;
        Ok(Page::new(items, page, total))
    }

    /// Renaming onto another of the owner's categories is `DuplicateName`;
    /// keeping the current name is not.
    pub fn update(
        &self,
        owner_id: &str,
        id: &str,
        input: UpdateCategory,
    ) -> Result<CategoryWithCount> {
        let mut category = ownership::owned_category(self.store.as_ref(), owner_id, id)?.category;

        if let Some(name) = &input.name {
            category.name = validation::normalize_category_name(name)?;
        }
        if let Some(description) = input.description {
            validation::validate_description(description.as_deref())?;
            category.description = description;
        }
        if let Some(color) = input.color {
            validation::validate_color(color.as_deref())?;
            category.color = color;
        }

        self.store.update_category(&category)?;
        tracing::debug!(category_id = id, owner_id, "updated category");

        ownership::owned_category(self.store.as_ref(), owner_id, id)
    }

    /// Bookmarks in the category survive with their category cleared.
    pub fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        if !self.store.delete_category(owner_id, id)? {
            return Err(Error::NotFound("Category"));
        }
        tracing::debug!(category_id = id, owner_id, "deleted category");
        Ok(())
    }
}
