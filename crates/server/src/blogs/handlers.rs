use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::{Blog, BlogWithUser, LikesUpdate, NewBlog};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Ids are UUIDs; anything else is rejected before touching the store.
fn parse_id(id: &str) -> Result<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| Error::MalformattedId)
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogWithUser>>> {
    info!("GET /api/blogs");
    Ok(Json(state.store.list_blogs().await?))
}

/// GET /api/blogs/{id}
pub async fn get_blog(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Blog>> {
    info!("GET /api/blogs/{}", id);
    let id = parse_id(&id)?;

    state
        .store
        .get_blog(&id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound)
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<NewBlog>, JsonRejection>,
) -> Result<Json<Blog>> {
    let Json(req) = payload?;
    info!("POST /api/blogs - {:?} by {}", req.title, ctx.user_id());

    let draft = req.validate()?;
    let blog = state.store.create_blog(ctx.user_id(), draft).await?;

    Ok(Json(blog))
}

/// PUT /api/blogs/{id}
pub async fn update_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<LikesUpdate>, JsonRejection>,
) -> Result<Json<Blog>> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    info!("PUT /api/blogs/{} - likes={}", id, req.likes);

    state
        .store
        .update_likes(&id, req.likes)
        .await?
        .map(Json)
        .ok_or(Error::NotFound)
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/blogs/{} by {}", id, ctx.user_id());
    let id = parse_id(&id)?;

    let blog = state.store.get_blog(&id).await?.ok_or(Error::NotFound)?;

    if blog.user.as_deref() != Some(ctx.user_id()) {
        warn!("User {} tried to delete blog {} they do not own", ctx.user_id(), id);
        return Err(Error::NotOwner);
    }

    // Another request may have removed it since the ownership check
    if !state.store.delete_blog(&id).await? {
        return Err(Error::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
