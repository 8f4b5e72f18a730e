//! Website metadata deduplication.
//!
//! A metadata row is created lazily the first time any user bookmarks a URL.
//! Descriptive fields start out empty; enrichment happens elsewhere.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::sqlite::{format_datetime, is_unique_violation, parse_datetime};
use crate::error::Result;
use crate::types::{FindOrCreate, WebsiteMetadata};

pub(super) const METADATA_COLUMNS: &str =
    "m.id, m.url, m.title, m.description, m.favicon, m.image, m.created_at, m.updated_at";

/// Maps `METADATA_COLUMNS` starting at column `offset`.
pub(super) fn metadata_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<WebsiteMetadata> {
    Ok(WebsiteMetadata {
        id: row.get(offset)?,
        url: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        favicon: row.get(offset + 4)?,
        image: row.get(offset + 5)?,
        created_at: parse_datetime(&row.get::<_, String>(offset + 6)?),
        updated_at: parse_datetime(&row.get::<_, String>(offset + 7)?),
    })
}

pub(super) fn find_by_url(conn: &Connection, url: &str) -> Result<Option<WebsiteMetadata>> {
    let found = conn
        .query_row(
            &format!("SELECT {METADATA_COLUMNS} FROM website_metadata m WHERE m.url = ?1"),
            params![url],
            |row| metadata_from_row(row, 0),
        )
        .optional()?;
    Ok(found)
}

/// Returns the metadata row for `url`, inserting an empty placeholder when
/// none exists.
pub(super) fn get_or_create(conn: &Connection, url: &str) -> Result<FindOrCreate<WebsiteMetadata>> {
    match find_by_url(conn, url)? {
        Some(existing) => Ok(FindOrCreate::Existing(existing)),
        None => insert_placeholder(conn, url),
    }
}

/// Inserts an empty placeholder for `url`. An insert that loses to another
/// writer on the unique `url` constraint becomes a lookup of the winning row.
fn insert_placeholder(conn: &Connection, url: &str) -> Result<FindOrCreate<WebsiteMetadata>> {
    let now = Utc::now();
    let metadata = WebsiteMetadata {
        id: Uuid::new_v4().to_string(),
        url: url.to_string(),
        title: None,
        description: None,
        favicon: None,
        image: None,
        created_at: now,
        updated_at: now,
    };

    let inserted = conn.execute(
        "INSERT INTO website_metadata (id, url, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        params![metadata.id, metadata.url, format_datetime(&now)],
    );

    match inserted {
        Ok(_) => {
            tracing::debug!(url, "created website metadata placeholder");
            Ok(FindOrCreate::Created(metadata))
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!(url, "metadata insert raced with another writer, reusing existing row");
            match find_by_url(conn, url)? {
                Some(existing) => Ok(FindOrCreate::Existing(existing)),
                None => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::SCHEMA;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let conn = conn();

        let first = get_or_create(&conn, "https://example.com").unwrap();
        assert!(first.was_created());
        assert!(first.as_inner().title.is_none());

        let second = get_or_create(&conn, "https://example.com").unwrap();
        assert!(!second.was_created());
        assert_eq!(first.into_inner().id, second.into_inner().id);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM website_metadata", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_lost_insert_race_returns_existing_row() {
        let conn = conn();
        conn.execute(
            "INSERT INTO website_metadata (id, url, created_at, updated_at)
             VALUES ('winner', 'https://race.test', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();

        // The losing writer's lookup missed, so it goes straight to the insert.
        let resolved = insert_placeholder(&conn, "https://race.test").unwrap();
        assert!(!resolved.was_created());
        assert_eq!(resolved.into_inner().id, "winner");

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM website_metadata", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_urls_match_exactly() {
        let conn = conn();
        let a = get_or_create(&conn, "https://example.com").unwrap().into_inner();
        let b = get_or_create(&conn, "https://example.com/").unwrap().into_inner();
        assert_ne!(a.id, b.id);
    }
}
