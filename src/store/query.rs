use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;

use crate::types::BookmarkFilter;

/// Hard ceiling on any LIMIT the store issues, regardless of caller input.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Accumulates AND-ed conditions with their positional parameters.
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn push(&mut self, condition: impl Into<String>, params: impl IntoIterator<Item = Value>) {
        self.conditions.push(condition.into());
        self.params.extend(params);
    }

    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameters followed by LIMIT and OFFSET values.
    pub fn params_with_page(&self, limit: i64, offset: i64) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(clamp_limit(limit)));
        params.push(Value::Integer(offset.max(0)));
        params
    }
}

pub(crate) fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(0, MAX_PAGE_SIZE)
}

/// SQL name of the Unicode lowercase function used by search clauses.
/// SQLite's own `lower()` and `LIKE` fold ASCII letters only.
pub(crate) const FOLD_FN: &str = "unicode_lower";

/// Registers [`FOLD_FN`] on `conn`. NULL stays NULL.
pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Lowercases `term` and wraps it in `%` after escaping LIKE metacharacters
/// with `\`. Compare against `unicode_lower(column)`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Builds the WHERE clause shared by the bookmark list and count queries.
/// Expects `bookmarks b` joined with `website_metadata m`.
pub(crate) fn bookmark_where(filter: &BookmarkFilter) -> WhereClause {
    let mut clause = WhereClause::default();

    clause.push("b.user_id = ?", [Value::Text(filter.user_id.clone())]);
    clause.push("b.deleted_at IS NULL", []);

    if let Some(category_id) = &filter.category_id {
        clause.push("b.category_id = ?", [Value::Text(category_id.clone())]);
    }

    if let Some(is_public) = filter.is_public {
        clause.push("b.is_public = ?", [Value::Integer(i64::from(is_public))]);
    }

    if let Some(tag_id) = &filter.tag_id {
        clause.push(
            "EXISTS (SELECT 1 FROM bookmark_tags ft WHERE ft.bookmark_id = b.id AND ft.tag_id = ?)",
            [Value::Text(tag_id.clone())],
        );
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        clause.push(
            "(unicode_lower(b.personal_title) LIKE ? ESCAPE '\\'
              OR unicode_lower(b.personal_note) LIKE ? ESCAPE '\\'
              OR unicode_lower(m.title) LIKE ? ESCAPE '\\'
              OR unicode_lower(m.url) LIKE ? ESCAPE '\\'
              OR EXISTS (SELECT 1 FROM bookmark_tags st
                         JOIN tags t ON t.id = st.tag_id
                         WHERE st.bookmark_id = b.id
                           AND unicode_lower(t.name) LIKE ? ESCAPE '\\'))",
            std::iter::repeat_n(Value::Text(pattern), 5),
        );
    }

    clause
}

/// WHERE clause for category/tag listings: owner plus optional name substring.
/// `alias` is the table alias carrying `user_id` and `name`.
pub(crate) fn owned_name_where(alias: &str, user_id: &str, search: Option<&str>) -> WhereClause {
    let mut clause = WhereClause::default();
    clause.push(format!("{alias}.user_id = ?"), [Value::Text(user_id.to_string())]);

    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        clause.push(
            format!("unicode_lower({alias}.name) LIKE ? ESCAPE '\\'"),
            [Value::Text(like_pattern(search))],
        );
    }

    clause
}
