//! Auth Handlers and Module

pub mod auth;
pub mod auth_me;

pub use auth::{create_user, list_users, login, logout};
pub use auth_me::me;
