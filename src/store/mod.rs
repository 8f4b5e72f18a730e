mod metadata;
mod query;
mod schema;
mod sqlite;
mod tag_resolver;

pub use query::MAX_PAGE_SIZE;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Every read or write on a user-owned row takes the requesting user's id and
/// only matches rows that user owns. Bookmark lookups additionally exclude
/// soft-deleted rows unless the method name says otherwise.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;

    // Category operations
    fn create_category(&self, category: &Category) -> Result<()>;
    fn get_category(&self, user_id: &str, id: &str) -> Result<Option<CategoryWithCount>>;
    fn list_categories(
        &self,
        user_id: &str,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CategoryWithCount>>;
    fn count_categories(&self, user_id: &str, search: Option<&str>) -> Result<i64>;
    fn update_category(&self, category: &Category) -> Result<()>;
    fn delete_category(&self, user_id: &str, id: &str) -> Result<bool>;

    // Tag operations
    fn create_tag(&self, tag: &Tag) -> Result<()>;
    fn get_tag(&self, user_id: &str, id: &str) -> Result<Option<TagWithCount>>;
    fn get_tag_by_name(&self, user_id: &str, name: &str) -> Result<Option<Tag>>;
    fn list_tags(
        &self,
        user_id: &str,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TagWithCount>>;
    fn count_tags(&self, user_id: &str, search: Option<&str>) -> Result<i64>;
    fn update_tag(&self, tag: &Tag) -> Result<()>;
    fn delete_tag(&self, user_id: &str, id: &str) -> Result<bool>;

    // Bookmark operations
    fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<()>;
    fn get_bookmark(&self, user_id: &str, id: &str) -> Result<Option<BookmarkAggregate>>;
    fn get_bookmark_including_deleted(&self, user_id: &str, id: &str)
    -> Result<Option<Bookmark>>;
    fn list_bookmarks(
        &self,
        filter: &BookmarkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookmarkAggregate>>;
    fn count_bookmarks(&self, filter: &BookmarkFilter) -> Result<i64>;
    fn update_bookmark(&self, user_id: &str, id: &str, changes: &BookmarkChanges) -> Result<()>;
    fn soft_delete_bookmark(&self, user_id: &str, id: &str) -> Result<bool>;

    // Bookmark-Tag M2M operations
    fn add_bookmark_tags(&self, user_id: &str, bookmark_id: &str, names: &[String])
    -> Result<()>;
    fn remove_bookmark_tag(&self, user_id: &str, bookmark_id: &str, tag_id: &str)
    -> Result<bool>;

    fn close(&self) -> Result<()>;
}
