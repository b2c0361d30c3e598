//! User and login handlers

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::models::{LoginRequest, LoginResponse, NewUser, User, UserWithBlogs};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(req) = payload?;
    info!("POST /api/users - {:?}", req.username);

    match state.auth.register(req).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            warn!("User creation failed: {}", e);
            Err(e)
        }
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserWithBlogs>>> {
    info!("GET /api/users");
    Ok(Json(state.auth.list_users().await?))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    info!("POST /api/login - {}", req.username);

    let (user, session) = state.auth.login(&req.username, &req.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        username: user.username,
        name: user.name,
    }))
}

/// POST /api/logout
pub async fn logout(State(state): State<AppState>, ctx: Ctx) -> Result<StatusCode> {
    info!("POST /api/logout - {}", ctx.user_id());
    state.auth.logout(ctx.token()).await?;
    Ok(StatusCode::NO_CONTENT)
}
