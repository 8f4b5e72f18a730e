use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::ownership;
use super::pagination::{Page, PageRequest};
use super::validation;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Tag, TagWithCount};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTag {
    pub name: String,
}

pub struct TagService {
    store: Arc<dyn Store>,
}

impl TagService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Explicit creation rejects an existing name; bookmark tagging reuses it instead.
    pub fn create(&self, owner_id: &str, input: CreateTag) -> Result<TagWithCount> {
        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            name: validation::normalize_tag_name(&input.name)?,
            created_at: Utc::now(),
        };

        self.store.create_tag(&tag)?;
        tracing::debug!(tag_id = %tag.id, owner_id, name = %tag.name, "created tag");

        Ok(TagWithCount {
            tag,
            bookmark_count: 0,
        })
    }

    pub fn get(&self, owner_id: &str, id: &str) -> Result<TagWithCount> {
        ownership::owned_tag(self.store.as_ref(), owner_id, id)
    }

    pub fn list(
        &self,
        owner_id: &str,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<TagWithCount>> {
        let total = self.store.count_tags(owner_id, search)?;
        let items = self
            .store
            .list_tags(owner_id, search, page.limit(), page.offset())?;
        Ok(Page::new(items, page, total))
    }

    pub fn update(&self, owner_id: &str, id: &str, input: UpdateTag) -> Result<TagWithCount> {
        let mut tag = ownership::owned_tag(self.store.as_ref(), owner_id, id)?.tag;
        tag.name = validation::normalize_tag_name(&input.name)?;

        self.store.update_tag(&tag)?;
        tracing::debug!(tag_id = id, owner_id, name = %tag.name, "renamed tag");

        ownership::owned_tag(self.store.as_ref(), owner_id, id)
    }

    /// Detaches the tag from every bookmark and removes it.
    pub fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        if !self.store.delete_tag(owner_id, id)? {
            return Err(Error::NotFound("Tag"));
        }
        tracing::debug!(tag_id = id, owner_id, "deleted tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support;
    use crate::service::{BookmarkService, CreateBookmark};

    fn setup() -> (tempfile::TempDir, Arc<dyn Store>, TagService) {
        let (temp, store) = test_support::store();
        test_support::user(store.as_ref(), "alice");
        test_support::user(store.as_ref(), "bob");
        let service = TagService::new(store.clone());
        (temp, store, service)
    }

    fn named(name: &str) -> CreateTag {
        CreateTag {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let (_temp, _store, service) = setup();
        service.create("alice", named("rust")).unwrap();

        assert!(matches!(
            service.create("alice", named("rust")),
            Err(Error::DuplicateName(_))
        ));
        assert!(service.create("bob", named("rust")).is_ok());
    }

    #[test]
    fn test_bookmark_tagging_reuses_explicit_tag() {
        let (_temp, store, service) = setup();
        let explicit = service.create("alice", named("rust")).unwrap();

        let bookmark = BookmarkService::new(store.clone())
            .create(
                "alice",
                CreateBookmark {
                    url: "https://example.com".to_string(),
                    tags: vec!["rust".to_string()],
                    ..CreateBookmark::default()
                },
            )
            .unwrap();

        assert_eq!(bookmark.tags[0].id, explicit.tag.id);
        assert_eq!(service.get("alice", &explicit.tag.id).unwrap().bookmark_count, 1);
    }

    #[test]
    fn test_rename() {
        let (_temp, _store, service) = setup();
        let id = service.create("alice", named("rust")).unwrap().tag.id;
        service.create("alice", named("go")).unwrap();

        let renamed = service
            .update(
                "alice",
                &id,
                UpdateTag {
                    name: " rustlang ".to_string(),
                },
            )
            .unwrap();
        assert_eq!(renamed.tag.name, "rustlang");

        assert!(matches!(
            service.update("alice", &id, UpdateTag { name: "go".to_string() }),
            Err(Error::DuplicateName(_))
        ));
        assert!(matches!(
            service.update("bob", &id, UpdateTag { name: "x".to_string() }),
            Err(Error::NotFound("Tag"))
        ));
    }

    #[test]
    fn test_delete_detaches_from_bookmarks() {
        let (_temp, store, service) = setup();
        let bookmarks = BookmarkService::new(store.clone());
        let created = bookmarks
            .create(
                "alice",
                CreateBookmark {
                    url: "https://example.com".to_string(),
                    tags: vec!["a".to_string(), "b".to_string()],
                    ..CreateBookmark::default()
                },
            )
            .unwrap();

        let a = created.tags.iter().find(|t| t.name == "a").unwrap();
        service.delete("alice", &a.id).unwrap();
        assert!(matches!(service.delete("alice", &a.id), Err(Error::NotFound("Tag"))));

        let after = bookmarks.get("alice", &created.bookmark.id).unwrap();
        assert_eq!(after.tag_names(), vec!["b"]);
    }

    #[test]
    fn test_list_is_paginated() {
        let (_temp, _store, service) = setup();
        for name in ["a", "b", "c"] {
            service.create("alice", named(name)).unwrap();
        }

        let page = service
            .list("alice", PageRequest::new(Some(2), Some(2)).unwrap(), None)
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].tag.name, "c");
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_prev);
    }
}
