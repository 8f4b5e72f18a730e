mod accounts;
mod bookmarks;
mod categories;
pub mod ownership;
mod pagination;
mod tags;
pub mod validation;

pub use accounts::{AccountService, Session};
pub use bookmarks::{BookmarkQuery, BookmarkService, CreateBookmark, UpdateBookmark};
pub use categories::{CategoryService, CreateCategory, UpdateCategory};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest, Pagination};
pub use tags::{CreateTag, TagService, UpdateTag};

use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
