mod bookmark_tags;
mod bookmarks;
mod categories;
mod tags;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::server::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        // Bookmarks
        .route("/bookmarks", get(bookmarks::list_bookmarks))
        .route("/bookmarks", post(bookmarks::create_bookmark))
        .route("/bookmarks/{id}", get(bookmarks::get_bookmark))
        .route("/bookmarks/{id}", patch(bookmarks::update_bookmark))
        .route("/bookmarks/{id}", delete(bookmarks::delete_bookmark))
        // Bookmark relationships
        .route(
            "/bookmarks/{id}/tags",
            post(bookmark_tags::add_bookmark_tags),
        )
        .route(
            "/bookmarks/{id}/tags/{tag_id}",
            delete(bookmark_tags::remove_bookmark_tag),
        )
        .route(
            "/bookmarks/{id}/category",
            put(bookmarks::set_bookmark_category),
        )
        // Categories
        .route("/categories", get(categories::list_categories))
        .route("/categories", post(categories::create_category))
        .route("/categories/{id}", get(categories::get_category))
        .route("/categories/{id}", patch(categories::update_category))
        .route("/categories/{id}", delete(categories::delete_category))
        // Tags
        .route("/tags", get(tags::list_tags))
        .route("/tags", post(tags::create_tag))
        .route("/tags/{id}", get(tags::get_tag))
        .route("/tags/{id}", patch(tags::update_tag))
        .route("/tags/{id}", delete(tags::delete_tag))
}
