//! Core Service Layer
//!
//! Provides shared infrastructure for the bloglist server, including
//! authentication, data models, configuration, and storage.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod models;
pub mod router;
pub mod store;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use router::router;
