use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    /// Carries only the entity name. Absent, foreign-owned, and soft-deleted
    /// rows all surface as this variant.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("token lookup collision")]
    TokenLookupCollision,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for the operational kinds a caller can fix by changing its input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound(_)
                | Self::DuplicateName(_)
                | Self::InvalidReference(_)
                | Self::Conflict(_)
                | Self::Unauthorized
                | Self::InvalidTokenFormat
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        assert_eq!(Error::NotFound("Bookmark").to_string(), "Bookmark not found");
    }

    #[test]
    fn test_database_errors_are_not_client_errors() {
        let err = Error::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_client_error());
        assert!(Error::validation("bad").is_client_error());
    }
}
