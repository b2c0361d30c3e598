//! Bloglist server configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use crate::core::auth::AuthManager;
use crate::core::store::{self, BlogStore};

/// Longest accepted session lifetime, in days
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Configuration for the Bloglist Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// HTTP listen port
    pub port: u16,
    /// Lifetime of a login session in days (1..=MAX_SESSION_TTL_DAYS)
    pub session_ttl_days: i64,
    /// bcrypt work factor (4..=31)
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::var("BLOGLIST_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("bloglist_data")),
            port: env_or("PORT", 3003),
            session_ttl_days: env_or("SESSION_TTL_DAYS", 30).clamp(1, MAX_SESSION_TTL_DAYS),
            bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST).clamp(4, 31),
        }
    }
}

impl ServerConfig {
    /// Create config with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("bloglist.sqlite")
    }

    /// Ensure all directories exist
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<BlogStore>,
    pub auth: Arc<AuthManager>,
}

impl AppState {
    /// Open the database and initialize both managers on it.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        config.ensure_dirs().await?;
        let pool = store::connect(&config.db_path()).await?;

        // users/sessions first, blogs reference users
        let auth = Arc::new(AuthManager::new(pool.clone(), &config).await?);
        let store = Arc::new(BlogStore::new(pool).await?);

        Ok(Self {
            config,
            store,
            auth,
        })
    }
}
