//! bloglist-core: blog post records and the list statistics computed over them.
//!
//! - **post**: the `BlogPost` record the statistics consume.
//! - **list_helper**: pure reductions (total likes, favorite blog, most
//!   prolific author, most liked author).
//!
//! Nothing in this crate performs I/O. The server crate loads posts from
//! storage and hands them over as a slice.

pub mod list_helper;
pub mod post;

pub use list_helper::{
    favorite_blog, most_blogs, most_likes, total_likes, AuthorBlogs, AuthorLikes, FavoriteBlog,
};
pub use post::BlogPost;
