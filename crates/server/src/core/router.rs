//! Core Router
//!
//! Mounts the blog, user and auth routes. Routes that need a caller
//! identity sit behind `mw_require_auth`.

use crate::blogs;
use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::AppState;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/blogs", post(blogs::create_blog))
        .route("/api/blogs/{id}", delete(blogs::delete_blog))
        .route("/api/logout", post(auth_handlers::logout))
        .route("/api/me", get(auth_handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    Router::new()
        // Blog routes
        .route("/api/blogs", get(blogs::list_blogs))
        .route(
            "/api/blogs/{id}",
            get(blogs::get_blog).put(blogs::update_likes),
        )
        .route("/api/stats", get(blogs::stats))
        // User and auth routes
        .route(
            "/api/users",
            get(auth_handlers::list_users).post(auth_handlers::create_user),
        )
        .route("/api/login", post(auth_handlers::login))
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK - Bloglist Server"
}
