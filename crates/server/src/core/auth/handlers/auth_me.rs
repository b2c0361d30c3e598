use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::User;
use axum::extract::State;
use axum::Json;

/// GET /api/me
pub async fn me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<User>> {
    // Middleware already resolved the session; the user may have vanished since.
    let user = state
        .auth
        .get_user(ctx.user_id())
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(user))
}
