use crate::core::config::AppState;
use crate::core::error::Result;
use axum::{extract::State, Json};
use bloglist_core::{list_helper, AuthorBlogs, AuthorLikes, BlogPost, FavoriteBlog};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Summary of every stored blog. `favorite_blog` is null when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStats {
    pub total_likes: u64,
    pub favorite_blog: Option<FavoriteBlog>,
    pub most_blogs: AuthorBlogs,
    pub most_likes: AuthorLikes,
}

impl BlogStats {
    pub fn from_posts(posts: &[BlogPost]) -> Self {
        Self {
            total_likes: list_helper::total_likes(posts),
            favorite_blog: list_helper::favorite_blog(posts),
            most_blogs: list_helper::most_blogs(posts),
            most_likes: list_helper::most_likes(posts),
        }
    }
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<BlogStats>> {
    info!("GET /api/stats");
    let posts = state.store.blog_posts().await?;
    Ok(Json(BlogStats::from_posts(&posts)))
}
