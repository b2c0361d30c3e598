//! Blog endpoints
//!
//! CRUD over stored blogs plus the list statistics computed by
//! `bloglist-core`.

pub mod handlers;
pub mod stats;

pub use handlers::{create_blog, delete_blog, get_blog, list_blogs, update_likes};
pub use stats::{stats, BlogStats};
