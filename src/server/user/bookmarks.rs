use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::dto::{ListBookmarksParams, SetCategoryRequest};
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::service::{CreateBookmark, PageRequest, UpdateBookmark};

pub async fn list_bookmarks(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListBookmarksParams>,
) -> impl IntoResponse {
    let page = PageRequest::new(params.page, params.page_size)?;
    let bookmarks = state.bookmarks.list(&auth.user.id, page, params.query())?;

    Ok::<_, ApiError>(Json(PaginatedResponse::from(bookmarks)))
}

pub async fn create_bookmark(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateBookmark>,
) -> impl IntoResponse {
    let bookmark = state.bookmarks.create(&auth.user.id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(bookmark))))
}

pub async fn get_bookmark(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let bookmark = state.bookmarks.get(&auth.user.id, &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(bookmark)))
}

pub async fn update_bookmark(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateBookmark>,
) -> impl IntoResponse {
    let bookmark = state.bookmarks.update(&auth.user.id, &id, req)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(bookmark)))
}

pub async fn delete_bookmark(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.bookmarks.delete(&auth.user.id, &id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn set_bookmark_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SetCategoryRequest>,
) -> impl IntoResponse {
    let bookmark = state
        .bookmarks
        .set_category(&auth.user.id, &id, req.category_id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(bookmark)))
}
