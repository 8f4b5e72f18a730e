use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Descriptive data about a URL, shared by every bookmark that points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteMetadata {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub metadata_id: String,
    pub category_id: Option<String>,
    pub personal_title: Option<String>,
    pub personal_note: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookmark joined with its metadata, category, and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkAggregate {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub metadata: WebsiteMetadata,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl BookmarkAggregate {
    /// Tag names in display order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub bookmark_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub bookmark_count: i64,
}

/// Everything the store needs to write a bookmark and its initial tag set in
/// one transaction. Tag names must already be normalized.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub category_id: Option<String>,
    pub personal_title: Option<String>,
    pub personal_note: Option<String>,
    pub is_public: bool,
    pub tag_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A partial update. `None` leaves a column untouched; `Some(None)` clears a
/// nullable column. `tag_names`, when present, replaces the whole tag set.
#[derive(Debug, Clone, Default)]
pub struct BookmarkChanges {
    pub personal_title: Option<Option<String>>,
    pub personal_note: Option<Option<String>>,
    pub category_id: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub tag_names: Option<Vec<String>>,
}

impl BookmarkChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personal_title.is_none()
            && self.personal_note.is_none()
            && self.category_id.is_none()
            && self.is_public.is_none()
            && self.tag_names.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookmarkFilter {
    pub user_id: String,
    pub category_id: Option<String>,
    pub is_public: Option<bool>,
    pub tag_id: Option<String>,
    pub search: Option<String>,
}

impl BookmarkFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Outcome of an insert-or-lookup against a unique key.
#[derive(Debug, Clone, PartialEq)]
pub enum FindOrCreate<T> {
    Created(T),
    Existing(T),
}

impl<T> FindOrCreate<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(v) | Self::Existing(v) => v,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Self::Created(v) | Self::Existing(v) => v,
        }
    }

    #[must_use]
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
