//! Authentication Module
//!
//! Handles user registration, login, and session management.
//! Users and sessions are stored in the SQLite database (bloglist.sqlite)
//! next to the blogs they own.

pub mod handlers;
pub mod middleware;

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::config::{ServerConfig, MAX_SESSION_TTL_DAYS};
use crate::core::error::{Error, Result};
use crate::core::models::{BlogRef, NewUser, Session, User, UserWithBlogs};
use crate::core::store::likes_from_db;

type UserRow = (String, String, Option<String>, String, String);

fn user_from_row((id, username, name, password_hash, created_at): UserRow) -> User {
    User {
        id,
        username,
        name,
        password_hash,
        created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
    }
}

/// Auth manager handles all authentication
pub struct AuthManager {
    pool: SqlitePool,
    bcrypt_cost: u32,
    session_ttl: Duration,
    /// In-memory session cache
    sessions: RwLock<HashMap<String, Session>>,
}

impl AuthManager {
    /// Create new auth manager
    pub async fn new(pool: SqlitePool, config: &ServerConfig) -> Result<Self> {
        let manager = Self {
            pool,
            bcrypt_cost: config.bcrypt_cost,
            // Negative TTLs mean already expired
            session_ttl: Duration::days(config.session_ttl_days.clamp(0, MAX_SESSION_TTL_DAYS)),
            sessions: RwLock::new(HashMap::new()),
        };

        manager.init_db().await?;

        info!("[Auth] Initialized");

        Ok(manager)
    }

    async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Register a new user
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        let draft = new_user.validate()?;

        if self.find_user_by_username(&draft.username).await?.is_some() {
            return Err(Error::UsernameTaken(draft.username));
        }

        let cost = self.bcrypt_cost;
        let password = draft.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost)).await??;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: draft.username,
            name: draft.name,
            password_hash,
            created_at: Utc::now(),
        };

        let inserted = sqlx::query(
            "INSERT INTO users (id, username, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {}
            // Lost a race with a concurrent registration of the same name
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(Error::UsernameTaken(user.username));
            }
            Err(e) => return Err(e.into()),
        }

        info!("[Auth] User registered: {}", user.username);

        Ok(user)
    }

    /// Login user and create session
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, Session)> {
        let user = match self.find_user_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("[Auth] Login attempt for unknown user {}", username);
                return Err(Error::LoginFail);
            }
        };

        let candidate = password.to_string();
        let password_hash = user.password_hash.clone();
        let valid =
            tokio::task::spawn_blocking(move || verify(candidate, &password_hash)).await??;

        if !valid {
            warn!("[Auth] Failed login attempt for {}", username);
            return Err(Error::LoginFail);
        }

        let session = self.create_session(&user.id).await?;

        info!("[Auth] User logged in: {}", user.username);

        Ok((user, session))
    }

    /// Create new session
    async fn create_session(&self, user_id: &str) -> Result<Session> {
        let now = Utc::now();
        self.prune_expired_sessions(now).await?;

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.session_ttl,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(session.created_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        // Cache session
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        Ok(session)
    }

    /// Drop every session that expired at or before `now`
    async fn prune_expired_sessions(&self, now: DateTime<Utc>) -> Result<()> {
        self.sessions
            .write()
            .await
            .retain(|_, session| session.expires_at > now);

        let pruned =
            sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
                .bind(now.to_rfc3339())
                .execute(&self.pool)
                .await?
                .rows_affected();

        if pruned > 0 {
            info!("[Auth] Pruned {} expired sessions", pruned);
        }

        Ok(())
    }

    /// Resolve a bearer token to its user
    pub async fn validate_session(&self, token: &str) -> Result<User> {
        let cached = self.sessions.read().await.get(token).cloned();

        let session = match cached {
            Some(session) => session,
            None => {
                let row: Option<(String, String, String, String)> = sqlx::query_as(
                    "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
                )
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

                let (token, user_id, created_at, expires_at) =
                    row.ok_or(Error::SessionInvalid)?;
                let session = Session {
                    token,
                    user_id,
                    created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
                    expires_at: expires_at
                        .parse::<DateTime<Utc>>()
                        .map_err(|_| Error::SessionInvalid)?,
                };
                self.sessions
                    .write()
                    .await
                    .insert(session.token.clone(), session.clone());
                session
            }
        };

        if session.expires_at <= Utc::now() {
            self.logout(token).await?;
            return Err(Error::SessionInvalid);
        }

        self.get_user(&session.user_id)
            .await?
            .ok_or(Error::SessionInvalid)
    }

    /// Logout user (invalidate session)
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);

        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        info!("[Auth] Session invalidated");

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    /// List all users with the blogs they own
    pub async fn list_users(&self) -> Result<Vec<UserWithBlogs>> {
        let users: Vec<(String, String, Option<String>)> =
            sqlx::query_as("SELECT id, username, name FROM users ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        let blogs: Vec<(String, String, String, i64, String)> = sqlx::query_as(
            "SELECT id, title, url, likes, user_id FROM blogs WHERE user_id IS NOT NULL ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut owned: HashMap<String, Vec<BlogRef>> = HashMap::new();
        for (id, title, url, likes, user_id) in blogs {
            owned.entry(user_id).or_default().push(BlogRef {
                id,
                title,
                url,
                likes: likes_from_db(likes),
            });
        }

        Ok(users
            .into_iter()
            .map(|(id, username, name)| UserWithBlogs {
                blogs: owned.remove(&id).unwrap_or_default(),
                id,
                username,
                name,
            })
            .collect())
    }
}
