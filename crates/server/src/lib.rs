//! Bloglist Server Library
//!
//! REST backend for a shared blog list: blog CRUD, user accounts with
//! bcrypt-hashed passwords, bearer sessions, and list statistics from
//! `bloglist-core`.

pub mod blogs;
pub mod core;

use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::{router, AppState, ServerConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== Bloglist Server ===");

    let config = ServerConfig::default();
    info!("Data directory: {:?}", config.data_dir);
    info!("Database: {:?}", config.db_path());

    let state = AppState::new(config.clone()).await?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
