use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::extract::ApiJson;
use crate::server::dto::AddTagsRequest;
use crate::server::response::{ApiError, ApiResponse};

pub async fn add_bookmark_tags(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddTagsRequest>,
) -> impl IntoResponse {
    let bookmark = state.bookmarks.add_tags(&auth.user.id, &id, &req.tags)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(bookmark)))
}

pub async fn remove_bookmark_tag(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, tag_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let bookmark = state.bookmarks.remove_tag(&auth.user.id, &id, &tag_id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(bookmark)))
}
