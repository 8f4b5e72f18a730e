use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};
use chrono::Duration;

use super::account::account_router;
use super::user::user_router;
use crate::service::{AccountService, BookmarkService, CategoryService, TagService};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub accounts: AccountService,
    pub bookmarks: BookmarkService,
    pub categories: CategoryService,
    pub tags: TagService,
}

impl AppState {
    /// Builds every service around the same store handle.
    pub fn new(store: Arc<dyn Store>, token_ttl: Duration) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), token_ttl),
            bookmarks: BookmarkService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            tags: TagService::new(store.clone()),
            store,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", account_router())
        .nest("/api/v1", user_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::store::SqliteStore;

    fn app() -> (TempDir, Router) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        let state = Arc::new(AppState::new(Arc::new(store), Duration::hours(1)));
        (temp, create_router(state))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_temp, app) = app();
        let response = app
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bookmarks_require_auth() {
        let (_temp, app) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/bookmarks", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
        let body = json_body(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_register_and_create_bookmark() {
        let (_temp, app) = app();

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(serde_json::json!({
                    "email": "alice@example.com",
                    "password": "password123",
                    "name": "Alice"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert!(body["data"]["user"].get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/bookmarks",
                Some(&token),
                Some(serde_json::json!({ "url": "https://example.com", "tags": ["dev"] })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["data"]["metadata"]["url"], "https://example.com");
        assert_eq!(body["data"]["tags"][0]["name"], "dev");

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/v1/bookmarks?page_size=101",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
    }
}
