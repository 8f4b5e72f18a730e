//! Owner-scoped lookups.
//!
//! The store filters on the owner, so a row that is missing, belongs to
//! another user, or is soft-deleted all come back as `None`. These helpers
//! turn that `None` into a single error kind per call site.

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{BookmarkAggregate, CategoryWithCount, TagWithCount};

pub fn owned_bookmark(store: &dyn Store, owner_id: &str, id: &str) -> Result<BookmarkAggregate> {
    store
        .get_bookmark(owner_id, id)?
        .ok_or(Error::NotFound("Bookmark"))
}

pub fn owned_category(store: &dyn Store, owner_id: &str, id: &str) -> Result<CategoryWithCount> {
    store
        .get_category(owner_id, id)?
        .ok_or(Error::NotFound("Category"))
}

pub fn owned_tag(store: &dyn Store, owner_id: &str, id: &str) -> Result<TagWithCount> {
    store.get_tag(owner_id, id)?.ok_or(Error::NotFound("Tag"))
}

/// A category id supplied as a field on another entity.
pub fn category_reference(store: &dyn Store, owner_id: &str, category_id: &str) -> Result<()> {
    match store.get_category(owner_id, category_id)? {
        Some(_) => Ok(()),
        None => Err(Error::InvalidReference(format!(
            "Category '{category_id}' does not exist"
        ))),
    }
}

/// A tag id supplied as a field on another entity.
pub fn tag_reference(store: &dyn Store, owner_id: &str, tag_id: &str) -> Result<()> {
    match store.get_tag(owner_id, tag_id)? {
        Some(_) => Ok(()),
        None => Err(Error::InvalidReference(format!("Tag '{tag_id}' does not exist"))),
    }
}
