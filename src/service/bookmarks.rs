use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::ownership;
use super::pagination::{Page, PageRequest};
use super::validation;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{BookmarkAggregate, BookmarkChanges, BookmarkFilter, NewBookmark};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookmark {
    pub url: String,
    #[serde(default)]
    pub personal_title: Option<String>,
    #[serde(default)]
    pub personal_note: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Absent fields are left alone. `null` clears the nullable ones. `tags`
/// replaces the whole tag set when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookmark {
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub personal_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub personal_note: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub category_id: Option<Option<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct BookmarkQuery {
    pub category_id: Option<String>,
    pub is_public: Option<bool>,
    pub tag_id: Option<String>,
    pub search: Option<String>,
}

pub struct BookmarkService {
    store: Arc<dyn Store>,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner_id: &str, input: CreateBookmark) -> Result<BookmarkAggregate> {
        let url = validation::normalize_url(&input.url)?;
        validation::validate_personal_title(input.personal_title.as_deref())?;
        validation::validate_personal_note(input.personal_note.as_deref())?;
        let tag_names = validation::normalize_tag_names(&input.tags)?;

        if let Some(category_id) = &input.category_id {
            ownership::category_reference(self.store.as_ref(), owner_id, category_id)?;
        }

        let bookmark = NewBookmark {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            url,
            category_id: input.category_id,
            personal_title: input.personal_title,
            personal_note: input.personal_note,
            is_public: input.is_public,
            tag_names,
            created_at: Utc::now(),
        };

        self.store.create_bookmark(&bookmark)?;
        tracing::debug!(bookmark_id = %bookmark.id, owner_id, url = %bookmark.url, "created bookmark");

        ownership::owned_bookmark(self.store.as_ref(), owner_id, &bookmark.id)
    }

    pub fn list(
        &self,
        owner_id: &str,
        page: PageRequest,
        query: BookmarkQuery,
    ) -> Result<Page<BookmarkAggregate>> {
        if let Some(category_id) = &query.category_id {
            ownership::category_reference(self.store.as_ref(), owner_id, category_id)?;
        }
        if let Some(tag_id) = &query.tag_id {
            ownership::tag_reference(self.store.as_ref(), owner_id, tag_id)?;
        }

        let filter = BookmarkFilter {
            user_id: owner_id.to_string(),
            category_id: query.category_id,
            is_public: query.is_public,
            tag_id: query.tag_id,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };

        let total = self.store.count_bookmarks(&filter)?;
        let items = self
            .store
            .list_bookmarks(&filter, page.limit(), page.offset())?;

        Ok(Page::new(items, page, total))
    }

    pub fn get(&self, owner_id: &str, id: &str) -> Result<BookmarkAggregate> {
        ownership::owned_bookmark(self.store.as_ref(), owner_id, id)
    }

    pub fn update(
        &self,
        owner_id: &str,
        id: &str,
        input: UpdateBookmark,
    ) -> Result<BookmarkAggregate> {
        let current = ownership::owned_bookmark(self.store.as_ref(), owner_id, id)?;

        if let Some(title) = &input.personal_title {
            validation::validate_personal_title(title.as_deref())?;
        }
        if let Some(note) = &input.personal_note {
            validation::validate_personal_note(note.as_deref())?;
        }
        let tag_names = input
            .tags
            .as_deref()
            .map(validation::normalize_tag_names)
            .transpose()?;

        if let Some(Some(category_id)) = &input.category_id {
            if current.bookmark.category_id.as_deref() != Some(category_id.as_str()) {
                ownership::category_reference(self.store.as_ref(), owner_id, category_id)?;
            }
        }

        let changes = BookmarkChanges {
            personal_title: input.personal_title,
            personal_note: input.personal_note,
            category_id: input.category_id,
            is_public: input.is_public,
            tag_names,
        };

        if changes.is_empty() {
            return Ok(current);
        }

        self.store.update_bookmark(owner_id, id, &changes)?;
        tracing::debug!(bookmark_id = id, owner_id, replace_tags = changes.tag_names.is_some(), "updated bookmark");

        ownership::owned_bookmark(self.store.as_ref(), owner_id, id)
    }

    /// Marks the bookmark deleted. A second delete reports `NotFound`.
    pub fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        if !self.store.soft_delete_bookmark(owner_id, id)? {
            return Err(Error::NotFound("Bookmark"));
        }
        tracing::debug!(bookmark_id = id, owner_id, "soft-deleted bookmark");
        Ok(())
    }

    /// Attaches `names` on top of the current tag set.
    pub fn add_tags(&self, owner_id: &str, id: &str, names: &[String]) -> Result<BookmarkAggregate> {
        let names = validation::normalize_tag_names(names)?;
        if names.is_empty() {
            return Err(Error::validation("At least one tag name is required"));
        }

        self.store.add_bookmark_tags(owner_id, id, &names)?;
        tracing::debug!(bookmark_id = id, owner_id, count = names.len(), "attached tags");

        ownership::owned_bookmark(self.store.as_ref(), owner_id, id)
    }

    pub fn remove_tag(&self, owner_id: &str, id: &str, tag_id: &str) -> Result<BookmarkAggregate> {
        ownership::owned_bookmark(self.store.as_ref(), owner_id, id)?;
        ownership::tag_reference(self.store.as_ref(), owner_id, tag_id)?;

        if !self.store.remove_bookmark_tag(owner_id, id, tag_id)? {
            return Err(Error::NotFound("Tag"));
        }
        tracing::debug!(bookmark_id = id, owner_id, tag_id, "detached tag");

        ownership::owned_bookmark(self.store.as_ref(), owner_id, id)
    }

    /// Moves the bookmark into `category_id`, or out of any category for `None`.
    pub fn set_category(
        &self,
        owner_id: &str,
        id: &str,
        category_id: Option<String>,
    ) -> Result<BookmarkAggregate> {
        self.update(
            owner_id,
            id,
            UpdateBookmark {
                category_id: Some(category_id),
                ..UpdateBookmark::default()
            },
        )
    }
}
