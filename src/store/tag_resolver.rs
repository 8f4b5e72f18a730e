//! Find-or-create resolution of free-text tag names into a user's tags.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::sqlite::{format_datetime, is_unique_violation, parse_datetime};
use crate::error::Result;
use crate::types::{FindOrCreate, Tag};

pub(super) const TAG_COLUMNS: &str = "t.id, t.user_id, t.name, t.created_at";

pub(super) fn tag_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(offset)?,
        user_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        created_at: parse_datetime(&row.get::<_, String>(offset + 3)?),
    })
}

pub(super) fn find_by_name(conn: &Connection, user_id: &str, name: &str) -> Result<Option<Tag>> {
    let found = conn
        .query_row(
            &format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.user_id = ?1 AND t.name = ?2"),
            params![user_id, name],
            |row| tag_from_row(row, 0),
        )
        .optional()?;
    Ok(found)
}

/// Looks up `(user_id, name)` and creates the tag when missing.
pub(super) fn find_or_create(conn: &Connection, user_id: &str, name: &str) -> Result<FindOrCreate<Tag>> {
    match find_by_name(conn, user_id, name)? {
        Some(tag) => Ok(FindOrCreate::Existing(tag)),
        None => insert_tag(conn, user_id, name),
    }
}

/// Inserts a new tag. A concurrent writer that inserted the same
/// `(user_id, name)` first turns this into a lookup of its row.
fn insert_tag(conn: &Connection, user_id: &str, name: &str) -> Result<FindOrCreate<Tag>> {
    let tag = Tag {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
    };

    let inserted = conn.execute(
        "INSERT INTO tags (id, user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![tag.id, tag.user_id, tag.name, format_datetime(&tag.created_at)],
    );

    match inserted {
        Ok(_) => Ok(FindOrCreate::Created(tag)),
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!(user_id, name, "tag insert raced with another writer, reusing existing row");
            match find_by_name(conn, user_id, name)? {
                Some(existing) => Ok(FindOrCreate::Existing(existing)),
                None => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves `names` to tags owned by `user_id`, creating any that are missing.
/// Repeated names resolve once; output order follows first occurrence.
pub(super) fn resolve(conn: &Connection, user_id: &str, names: &[String]) -> Result<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());

    for name in names {
        if tags.iter().any(|t| &t.name == name) {
            continue;
        }
        tags.push(find_or_create(conn, user_id, name)?.into_inner());
    }

    Ok(tags)
}

/// Attaches each tag to the bookmark, ignoring attachments that already exist.
pub(super) fn attach(conn: &Connection, bookmark_id: &str, tags: &[Tag]) -> Result<()> {
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?1, ?2)")?;
    for tag in tags {
        stmt.execute(params![bookmark_id, tag.id])?;
    }
    Ok(())
}
