use url::Url;

use crate::error::{Error, Result};

const MAX_URL_LEN: usize = 2048;
const MAX_TITLE_LEN: usize = 255;
const MAX_NOTE_LEN: usize = 10_000;
const MAX_CATEGORY_NAME_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_TAG_NAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 254;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_DISPLAY_NAME_LEN: usize = 100;

fn validate_name(name: &str, entity: &str, max_len: usize) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation(format!("{entity} name cannot be empty")));
    }
    if name.chars().count() > max_len {
        return Err(Error::validation(format!(
            "{entity} name cannot exceed {max_len} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_max_len(value: Option<&str>, field: &str, max_len: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max_len => Err(Error::validation(format!(
            "{field} cannot exceed {max_len} characters"
        ))),
        _ => Ok(()),
    }
}

/// Trims `raw` and checks it is an absolute http(s) URL with a host.
/// The trimmed input is returned as-is, not the parser's normalized form.
pub fn normalize_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(Error::validation("URL is required"));
    }
    if url.len() > MAX_URL_LEN {
        return Err(Error::validation(format!(
            "URL cannot exceed {MAX_URL_LEN} characters"
        )));
    }

    let parsed = Url::parse(url).map_err(|_| Error::validation("URL must be a valid absolute URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::validation("URL must use http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::validation("URL must include a host"));
    }

    Ok(url.to_string())
}

pub fn validate_personal_title(title: Option<&str>) -> Result<()> {
    validate_max_len(title, "Personal title", MAX_TITLE_LEN)
}

pub fn validate_personal_note(note: Option<&str>) -> Result<()> {
    validate_max_len(note, "Personal note", MAX_NOTE_LEN)
}

pub fn normalize_category_name(name: &str) -> Result<String> {
    validate_name(name, "Category", MAX_CATEGORY_NAME_LEN)
}

pub fn validate_description(description: Option<&str>) -> Result<()> {
    validate_max_len(description, "Description", MAX_DESCRIPTION_LEN)
}

/// Accepts `#RRGGBB` hex colors only.
pub fn validate_color(color: Option<&str>) -> Result<()> {
    let Some(color) = color else {
        return Ok(());
    };

    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(Error::validation("Color must be a hex value like #1a2b3c"))
    }
}

pub fn normalize_tag_name(name: &str) -> Result<String> {
    validate_name(name, "Tag", MAX_TAG_NAME_LEN)
}

/// Trims every name, rejects blanks, and drops repeats keeping the first.
pub fn normalize_tag_names(names: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = normalize_tag_name(name)?;
        if !normalized.contains(&name) {
            normalized.push(name);
        }
    }
    Ok(normalized)
}

pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LEN {
        return Err(Error::validation(format!(
            "Email cannot exceed {MAX_EMAIL_LEN} characters"
        )));
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace) =>
        {
            Ok(email)
        }
        _ => Err(Error::validation("Email address is not valid")),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(Error::validation(format!(
            "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn normalize_display_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(Error::validation(format!(
            "Name must be between 1 and {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_accepts_http_and_https() {
        assert_eq!(normalize_url("  https://example.com/a?b=c ").unwrap(), "https://example.com/a?b=c");
        assert!(normalize_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_url_rejects_bad_input() {
        for bad in ["", "   ", "example.com", "ftp://example.com", "mailto:a@b.c", "https://"] {
            assert!(
                matches!(normalize_url(bad), Err(Error::Validation(_))),
                "accepted {bad:?}"
            );
        }

        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
        assert!(normalize_url(&long).is_err());
    }

    #[test]
    fn test_tag_names_are_trimmed_and_deduplicated() {
        let names = vec![
            " dev ".to_string(),
            "ref".to_string(),
            "dev".to_string(),
        ];
        assert_eq!(normalize_tag_names(&names).unwrap(), vec!["dev", "ref"]);
    }

    #[test]
    fn test_tag_names_reject_blank_and_long() {
        assert!(normalize_tag_names(&["  ".to_string()]).is_err());
        assert!(normalize_tag_name(&"x".repeat(MAX_TAG_NAME_LEN + 1)).is_err());
        assert!(normalize_tag_name(&"x".repeat(MAX_TAG_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_tag_names_keep_case() {
        let names = vec!["Rust".to_string(), "rust".to_string()];
        assert_eq!(normalize_tag_names(&names).unwrap().len(), 2);
    }

    #[test]
    fn test_color_format() {
        assert!(validate_color(None).is_ok());
        assert!(validate_color(Some("#A1b2C3")).is_ok());
        assert!(validate_color(Some("A1B2C3")).is_err());
        assert!(validate_color(Some("#12345")).is_err());
        assert!(validate_color(Some("#12345g")).is_err());
    }

    #[test]
    fn test_length_limits() {
        assert!(validate_personal_title(Some(&"t".repeat(MAX_TITLE_LEN))).is_ok());
        assert!(validate_personal_title(Some(&"t".repeat(MAX_TITLE_LEN + 1))).is_err());
        assert!(validate_personal_note(Some(&"n".repeat(MAX_NOTE_LEN + 1))).is_err());
        assert!(validate_description(Some(&"d".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
        assert!(normalize_category_name(" Work ").unwrap() == "Work");
    }

    #[test]
    fn test_email_is_lowercased() {
        assert_eq!(normalize_email(" Alice@Example.COM ").unwrap(), "alice@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@").is_err());
        assert!(normalize_email("a b@example.com").is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }
}
