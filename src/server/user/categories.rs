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
use crate::service::{CreateCategory, PageRequest, UpdateCategory};

pub async fn list_categories(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListNamedParams>,
) -> impl IntoResponse {
    let page = PageRequest::new(params.page, params.page_size)?;
    let categories = state
        .categories
        .list(&auth.user.id, page, params.search.as_deref())?;

    Ok::<_, ApiError>(Json(PaginatedResponse::from(categories)))
}

pub async fn create_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCategory>,
) -> impl IntoResponse {
    let category = state.categories.create(&auth.user.id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

pub async fn get_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let category = state.categories.get(&auth.user.id, &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(category)))
}

pub async fn update_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCategory>,
) -> impl IntoResponse {
    let category = state.categories.update(&auth.user.id, &id, req)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(category)))
}

pub async fn delete_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.categories.delete(&auth.user.id, &id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
