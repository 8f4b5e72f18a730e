use serde::Deserialize;

use crate::service::BookmarkQuery;

#[derive(Debug, Default, Deserialize)]
pub struct ListBookmarksParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListBookmarksParams {
    pub fn query(&self) -> BookmarkQuery {
        BookmarkQuery {
            category_id: self.category_id.clone(),
            is_public: self.is_public,
            tag_id: self.tag_id.clone(),
            search: self.search.clone(),
        }
    }
}

/// Query string shared by the category and tag listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListNamedParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddTagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetCategoryRequest {
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
