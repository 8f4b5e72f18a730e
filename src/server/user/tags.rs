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
use crate::server::dto::ListNamedParams;
use crate::server::response::{ApiError, ApiResponse, PaginatedResponse};
use crate::service::{CreateTag, PageRequest, UpdateTag};

pub async fn list_tags(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListNamedParams>,
) -> impl IntoResponse {
    let page = PageRequest::new(params.page, params.page_size)?;
    let tags = state
        .tags
        .list(&auth.user.id, page, params.search.as_deref())?;

    Ok::<_, ApiError>(Json(PaginatedResponse::from(tags)))
}

pub async fn create_tag(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTag>,
) -> impl IntoResponse {
    let tag = state.tags.create(&auth.user.id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(tag))))
}

pub async fn get_tag(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let tag = state.tags.get(&auth.user.id, &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tag)))
}

pub async fn update_tag(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTag>,
) -> impl IntoResponse {
    let tag = state.tags.update(&auth.user.id, &id, req)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tag)))
}

pub async fn delete_tag(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.tags.delete(&auth.user.id, &id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
