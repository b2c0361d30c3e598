//! Blog storage
//!
//! Blogs live in the same SQLite database as users and sessions
//! (bloglist.sqlite). Rows are returned in insertion order.

use bloglist_core::BlogPost;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::core::models::{Blog, BlogDraft, BlogWithUser, UserRef};

/// Open (creating if missing) the SQLite database at `db_path`.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    Ok(SqlitePoolOptions::new().connect_with(options).await?)
}

/// `likes` is stored as a signed SQLite INTEGER.
pub(crate) fn likes_to_db(likes: u64) -> Result<i64> {
    i64::try_from(likes).map_err(|_| Error::Validation("`likes` is too large".to_string()))
}

pub(crate) fn likes_from_db(likes: i64) -> u64 {
    u64::try_from(likes).unwrap_or(0)
}

type BlogRow = (String, String, Option<String>, String, i64, Option<String>);

fn blog_from_row((id, title, author, url, likes, user): BlogRow) -> Blog {
    Blog {
        id,
        title,
        author,
        url,
        likes: likes_from_db(likes),
        user,
    }
}

/// Blog store backed by SQLite
pub struct BlogStore {
    pool: SqlitePool,
}

impl BlogStore {
    /// Create the store and its table on an open pool
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.init_db().await?;
        info!("[Blogs] Store initialized");
        Ok(store)
    }

    async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT,
                url TEXT NOT NULL,
                likes INTEGER NOT NULL DEFAULT 0,
                user_id TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All blogs with their owners expanded
    pub async fn list_blogs(&self) -> Result<Vec<BlogWithUser>> {
        let rows: Vec<(
            String,
            String,
            Option<String>,
            String,
            i64,
            Option<String>,
            Option<String>,
            Option<String>,
        )> = sqlx::query_as(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, u.id, u.username, u.name
            FROM blogs b
            LEFT JOIN users u ON u.id = b.user_id
            ORDER BY b.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, title, author, url, likes, user_id, username, name)| BlogWithUser {
                    id,
                    title,
                    author,
                    url,
                    likes: likes_from_db(likes),
                    user: match (user_id, username) {
                        (Some(id), Some(username)) => Some(UserRef { id, username, name }),
                        _ => None,
                    },
                },
            )
            .collect())
    }

    pub async fn get_blog(&self, id: &str) -> Result<Option<Blog>> {
        let row: Option<BlogRow> = sqlx::query_as(
            "SELECT id, title, author, url, likes, user_id FROM blogs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(blog_from_row))
    }

    /// Insert a validated blog owned by `owner_id`
    pub async fn create_blog(&self, owner_id: &str, draft: BlogDraft) -> Result<Blog> {
        let blog = Blog {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            author: draft.author,
            url: draft.url,
            likes: draft.likes,
            user: Some(owner_id.to_string()),
        };

        sqlx::query(
            "INSERT INTO blogs (id, title, author, url, likes, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&blog.id)
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(likes_to_db(blog.likes)?)
        .bind(&blog.user)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Blogs] Created {} ({})", blog.title, blog.id);

        Ok(blog)
    }

    /// Set the like count. `None` when the blog does not exist.
    pub async fn update_likes(&self, id: &str, likes: u64) -> Result<Option<Blog>> {
        let result = sqlx::query("UPDATE blogs SET likes = ? WHERE id = ?")
            .bind(likes_to_db(likes)?)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_blog(id).await
    }

    /// Returns whether a row was removed
    pub async fn delete_blog(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every blog projected to the fields the list statistics read
    pub async fn blog_posts(&self) -> Result<Vec<BlogPost>> {
        let rows: Vec<(Option<String>, String, i64)> =
            sqlx::query_as("SELECT author, title, likes FROM blogs ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(author, title, likes)| BlogPost {
                author,
                title,
                likes: likes_from_db(likes),
            })
            .collect())
    }
}
