use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::extract::ApiJson;
use crate::server::dto::{LoginRequest, RegisterRequest};
use crate::server::response::{ApiError, ApiResponse};

pub fn account_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> impl IntoResponse {
    let session = state
        .accounts
        .register(&req.email, &req.password, &req.name)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    let session = state.accounts.login(&req.email, &req.password)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(session)))
}

async fn logout(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.accounts.logout(&auth.token)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

async fn me(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let user = state.accounts.me(&auth.user.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(user)))
}
