use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::metadata::{self, metadata_from_row};
use super::query::{WhereClause, bookmark_where, owned_name_where, register_functions};
use super::schema::SCHEMA;
use super::tag_resolver::{self, TAG_COLUMNS, tag_from_row};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        register_functions(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

pub(super) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // SQLite's datetime('now') default: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

pub(super) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn nullable_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        user_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        expires_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
    })
}

const CATEGORY_COLUMNS: &str =
    "c.id, c.user_id, c.name, c.description, c.color, c.created_at, c.updated_at";

fn category_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(offset)?,
        user_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        color: row.get(offset + 4)?,
        created_at: parse_datetime(&row.get::<_, String>(offset + 5)?),
        updated_at: parse_datetime(&row.get::<_, String>(offset + 6)?),
    })
}

const BOOKMARK_COLUMNS: &str = "b.id, b.user_id, b.metadata_id, b.category_id, b.personal_title, \
     b.personal_note, b.is_public, b.deleted_at, b.created_at, b.updated_at";

fn bookmark_from_row(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        user_id: row.get(1)?,
        metadata_id: row.get(2)?,
        category_id: row.get(3)?,
        personal_title: row.get(4)?,
        personal_note: row.get(5)?,
        is_public: row.get(6)?,
        deleted_at: row.get::<_, Option<String>>(7)?.map(|s| parse_datetime(&s)),
        created_at: parse_datetime(&row.get::<_, String>(8)?),
        updated_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

/// Bookmark (10 columns), metadata (8), then the optional category (7).
fn aggregate_select() -> String {
    format!(
        "SELECT {BOOKMARK_COLUMNS}, {}, {CATEGORY_COLUMNS}
         FROM bookmarks b
         JOIN website_metadata m ON m.id = b.metadata_id
         LEFT JOIN categories c ON c.id = b.category_id",
        metadata::METADATA_COLUMNS
    )
}

fn aggregate_from_row(row: &Row<'_>) -> rusqlite::Result<BookmarkAggregate> {
    let category = match row.get::<_, Option<String>>(18)? {
        Some(_) => Some(category_from_row(row, 18)?),
        None => None,
    };

    Ok(BookmarkAggregate {
        bookmark: bookmark_from_row(row)?,
        metadata: metadata_from_row(row, 10)?,
        category,
        tags: Vec::new(),
    })
}

/// Loads tags for every bookmark in `ids` with a single query.
fn load_tags(conn: &Connection, ids: &[&str]) -> Result<HashMap<String, Vec<Tag>>> {
    let mut by_bookmark: HashMap<String, Vec<Tag>> = HashMap::new();
    if ids.is_empty() {
        return Ok(by_bookmark);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT bt.bookmark_id, {TAG_COLUMNS}
         FROM bookmark_tags bt
         JOIN tags t ON t.id = bt.tag_id
         WHERE bt.bookmark_id IN ({placeholders})
         ORDER BY t.name"
    ))?;

    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
        Ok((row.get::<_, String>(0)?, tag_from_row(row, 1)?))
    })?;

    for row in rows {
        let (bookmark_id, tag) = row?;
        by_bookmark.entry(bookmark_id).or_default().push(tag);
    }

    Ok(by_bookmark)
}

fn query_aggregates(
    conn: &Connection,
    clause: &WhereClause,
    page: Option<(i64, i64)>,
) -> Result<Vec<BookmarkAggregate>> {
    let mut sql = aggregate_select();
    sql.push_str(&clause.sql());
    sql.push_str(" ORDER BY b.created_at DESC, b.rowid DESC");

    let params = match page {
        Some((limit, offset)) => {
            sql.push_str(" LIMIT ? OFFSET ?");
            clause.params_with_page(limit, offset)
        }
        None => clause.params().to_vec(),
    };

    let mut stmt = conn.prepare(&sql)?;
    let mut aggregates = stmt
        .query_map(params_from_iter(params.iter()), aggregate_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let ids: Vec<&str> = aggregates.iter().map(|a| a.bookmark.id.as_str()).collect();
    let mut tags = load_tags(conn, &ids)?;

    for aggregate in &mut aggregates {
        aggregate.tags = tags.remove(&aggregate.bookmark.id).unwrap_or_default();
    }

    Ok(aggregates)
}

fn owned_live_bookmark_exists(conn: &Connection, user_id: &str, id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM bookmarks WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![id, user_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn duplicate_name(entity: &str, name: &str) -> Error {
    Error::DuplicateName(format!("{entity} '{name}' already exists"))
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.email,
                user.password_hash,
                user.name,
                format_datetime(&user.created_at),
                format_datetime(&user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Conflict("email is already registered".to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, name, password_hash, created_at, updated_at FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, name, password_hash, created_at, updated_at FROM users WHERE email = ?1",
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(Error::TokenLookupCollision),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Category operations

    fn create_category(&self, category: &Category) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO categories (id, user_id, name, description, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                category.id,
                category.user_id,
                category.name,
                category.description,
                category.color,
                format_datetime(&category.created_at),
                format_datetime(&category.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(duplicate_name("Category", &category.name)),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_category(&self, user_id: &str, id: &str) -> Result<Option<CategoryWithCount>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {CATEGORY_COLUMNS}, COUNT(b.id)
                 FROM categories c
                 LEFT JOIN bookmarks b ON b.category_id = c.id AND b.deleted_at IS NULL
                 WHERE c.user_id = ?1 AND c.id = ?2
                 GROUP BY c.id"
            ),
            params![user_id, id],
            |row| {
                Ok(CategoryWithCount {
                    category: category_from_row(row, 0)?,
                    bookmark_count: row.get(7)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(
        &self,
        user_id: &str,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CategoryWithCount>> {
        let clause = owned_name_where("c", user_id, search);
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS}, COUNT(b.id)
             FROM categories c
             LEFT JOIN bookmarks b ON b.category_id = c.id AND b.deleted_at IS NULL{}
             GROUP BY c.id
             ORDER BY c.name
             LIMIT ? OFFSET ?",
            clause.sql()
        ))?;

        let rows = stmt.query_map(
            params_from_iter(clause.params_with_page(limit, offset).iter()),
            |row| {
                Ok(CategoryWithCount {
                    category: category_from_row(row, 0)?,
                    bookmark_count: row.get(7)?,
                })
            },
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_categories(&self, user_id: &str, search: Option<&str>) -> Result<i64> {
        let clause = owned_name_where("c", user_id, search);
        let conn = self.conn();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM categories c{}", clause.sql()),
            params_from_iter(clause.params().iter()),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_category(&self, category: &Category) -> Result<()> {
        let result = self.conn().execute(
            "UPDATE categories SET name = ?1, description = ?2, color = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                category.name,
                category.description,
                category.color,
                format_datetime(&Utc::now()),
                category.id,
                category.user_id,
            ],
        );

        match result {
            Ok(0) => Err(Error::NotFound("Category")),
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(duplicate_name("Category", &category.name)),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_category(&self, user_id: &str, id: &str) -> Result<bool> {
        // bookmarks.category_id is nulled by ON DELETE SET NULL
        let rows = self.conn().execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    // Tag operations

    fn create_tag(&self, tag: &Tag) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tags (id, user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                tag.id,
                tag.user_id,
                tag.name,
                format_datetime(&tag.created_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(duplicate_name("Tag", &tag.name)),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_tag(&self, user_id: &str, id: &str) -> Result<Option<TagWithCount>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {TAG_COLUMNS}, COUNT(b.id)
                 FROM tags t
                 LEFT JOIN bookmark_tags bt ON bt.tag_id = t.id
                 LEFT JOIN bookmarks b ON b.id = bt.bookmark_id AND b.deleted_at IS NULL
                 WHERE t.user_id = ?1 AND t.id = ?2
                 GROUP BY t.id"
            ),
            params![user_id, id],
            |row| {
                Ok(TagWithCount {
                    tag: tag_from_row(row, 0)?,
                    bookmark_count: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_tag_by_name(&self, user_id: &str, name: &str) -> Result<Option<Tag>> {
        tag_resolver::find_by_name(&self.conn(), user_id, name)
    }

    fn list_tags(
        &self,
        user_id: &str,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TagWithCount>> {
        let clause = owned_name_where("t", user_id, search);
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TAG_COLUMNS}, COUNT(b.id)
             FROM tags t
             LEFT JOIN bookmark_tags bt ON bt.tag_id = t.id
             LEFT JOIN bookmarks b ON b.id = bt.bookmark_id AND b.deleted_at IS NULL{}
             GROUP BY t.id
             ORDER BY t.name
             LIMIT ? OFFSET ?",
            clause.sql()
        ))?;

        let rows = stmt.query_map(
            params_from_iter(clause.params_with_page(limit, offset).iter()),
            |row| {
                Ok(TagWithCount {
                    tag: tag_from_row(row, 0)?,
                    bookmark_count: row.get(4)?,
                })
            },
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_tags(&self, user_id: &str, search: Option<&str>) -> Result<i64> {
        let clause = owned_name_where("t", user_id, search);
        let conn = self.conn();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM tags t{}", clause.sql()),
            params_from_iter(clause.params().iter()),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_tag(&self, tag: &Tag) -> Result<()> {
        let result = self.conn().execute(
            "UPDATE tags SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            params![tag.name, tag.id, tag.user_id],
        );

        match result {
            Ok(0) => Err(Error::NotFound("Tag")),
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(duplicate_name("Tag", &tag.name)),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_tag(&self, user_id: &str, id: &str) -> Result<bool> {
        // bookmark_tags rows go with it via ON DELETE CASCADE
        let rows = self.conn().execute(
            "DELETE FROM tags WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    // Bookmark operations

    fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let metadata = metadata::get_or_create(&tx, &bookmark.url)?.into_inner();

        tx.execute(
            "INSERT INTO bookmarks (id, user_id, metadata_id, category_id, personal_title, personal_note,
                                    is_public, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                bookmark.id,
                bookmark.user_id,
                metadata.id,
                bookmark.category_id,
                bookmark.personal_title,
                bookmark.personal_note,
                bookmark.is_public,
                format_datetime(&bookmark.created_at),
            ],
        )?;

        let tags = tag_resolver::resolve(&tx, &bookmark.user_id, &bookmark.tag_names)?;
        tag_resolver::attach(&tx, &bookmark.id, &tags)?;

        tx.commit()?;
        Ok(())
    }

    fn get_bookmark(&self, user_id: &str, id: &str) -> Result<Option<BookmarkAggregate>> {
        let mut clause = bookmark_where(&BookmarkFilter::for_user(user_id));
        clause.push("b.id = ?", [Value::Text(id.to_string())]);

        let conn = self.conn();
        Ok(query_aggregates(&conn, &clause, None)?.into_iter().next())
    }

    fn get_bookmark_including_deleted(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Bookmark>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks b WHERE b.id = ?1 AND b.user_id = ?2"),
            params![id, user_id],
            bookmark_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_bookmarks(
        &self,
        filter: &BookmarkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookmarkAggregate>> {
        let clause = bookmark_where(filter);
        let conn = self.conn();
        query_aggregates(&conn, &clause, Some((limit, offset)))
    }

    fn count_bookmarks(&self, filter: &BookmarkFilter) -> Result<i64> {
        let clause = bookmark_where(filter);
        let conn = self.conn();
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM bookmarks b JOIN website_metadata m ON m.id = b.metadata_id{}",
                clause.sql()
            ),
            params_from_iter(clause.params().iter()),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_bookmark(&self, user_id: &str, id: &str, changes: &BookmarkChanges) -> Result<()> {
        let mut assignments = Vec::new();
        let mut values = Vec::new();

        if let Some(title) = &changes.personal_title {
            assignments.push("personal_title = ?");
            values.push(nullable_text(title));
        }
        if let Some(note) = &changes.personal_note {
            assignments.push("personal_note = ?");
            values.push(nullable_text(note));
        }
        if let Some(category_id) = &changes.category_id {
            assignments.push("category_id = ?");
            values.push(nullable_text(category_id));
        }
        if let Some(is_public) = changes.is_public {
            assignments.push("is_public = ?");
            values.push(Value::Integer(i64::from(is_public)));
        }
        assignments.push("updated_at = ?");
        values.push(Value::Text(format_datetime(&Utc::now())));
        values.push(Value::Text(id.to_string()));
        values.push(Value::Text(user_id.to_string()));

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            &format!(
                "UPDATE bookmarks SET {} WHERE id = ? AND user_id = ? AND deleted_at IS NULL",
                assignments.join(", ")
            ),
            params_from_iter(values.iter()),
        )?;

        if rows == 0 {
            return Err(Error::NotFound("Bookmark"));
        }

        if let Some(names) = &changes.tag_names {
            tx.execute("DELETE FROM bookmark_tags WHERE bookmark_id = ?1", params![id])?;
            let tags = tag_resolver::resolve(&tx, user_id, names)?;
            tag_resolver::attach(&tx, id, &tags)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn soft_delete_bookmark(&self, user_id: &str, id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE bookmarks SET deleted_at = ?1, updated_at = ?1
             WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL",
            params![format_datetime(&Utc::now()), id, user_id],
        )?;
        Ok(rows > 0)
    }

    fn add_bookmark_tags(&self, user_id: &str, bookmark_id: &str, names: &[String]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if !owned_live_bookmark_exists(&tx, user_id, bookmark_id)? {
            return Err(Error::NotFound("Bookmark"));
        }

        let tags = tag_resolver::resolve(&tx, user_id, names)?;
        tag_resolver::attach(&tx, bookmark_id, &tags)?;

        tx.execute(
            "UPDATE bookmarks SET updated_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), bookmark_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn remove_bookmark_tag(&self, user_id: &str, bookmark_id: &str, tag_id: &str) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "DELETE FROM bookmark_tags
             WHERE bookmark_id = ?2 AND tag_id = ?3
               AND EXISTS (SELECT 1 FROM bookmarks b
                           WHERE b.id = ?2 AND b.user_id = ?1 AND b.deleted_at IS NULL)
               AND EXISTS (SELECT 1 FROM tags t WHERE t.id = ?3 AND t.user_id = ?1)",
            params![user_id, bookmark_id, tag_id],
        )?;

        if rows > 0 {
            tx.execute(
                "UPDATE bookmarks SET updated_at = ?1 WHERE id = ?2",
                params![format_datetime(&Utc::now()), bookmark_id],
            )?;
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        self.conn()
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}
