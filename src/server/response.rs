use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::Error;
use crate::service::{Page, Pagination};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// Paginated response for list endpoints
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            pagination: page.pagination,
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if !err.is_client_error() {
            tracing::error!("internal error: {err}");
            return Self::internal("Internal server error");
        }

        let (status, code) = match &err {
            Error::InvalidReference(_) => (StatusCode::BAD_REQUEST, "INVALID_REFERENCE"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::DuplicateName(_) => (StatusCode::CONFLICT, "DUPLICATE_NAME"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            _ => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };

        let message = match &err {
            Error::Unauthorized => "Invalid credentials".to_string(),
            Error::Conflict(detail) => capitalize(detail),
            other => other.to_string(),
        };

        Self {
            status,
            code,
            message,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message, "code": self.code });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_table() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                Error::InvalidReference("x".into()),
                StatusCode::BAD_REQUEST,
                "INVALID_REFERENCE",
            ),
            (Error::NotFound("Bookmark"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                Error::DuplicateName("dup".into()),
                StatusCode::CONFLICT,
                "DUPLICATE_NAME",
            ),
            (Error::Conflict("taken".into()), StatusCode::CONFLICT, "CONFLICT"),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (Error::InvalidTokenFormat, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                Error::TokenLookupCollision,
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                Error::Database(rusqlite::Error::QueryReturnedNoRows),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api = ApiError::from(Error::Config("secret path /etc/x".into()));
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn test_not_found_message_names_entity_only() {
        let api = ApiError::from(Error::NotFound("Bookmark"));
        assert_eq!(api.message, "Bookmark not found");
    }
}
