//! List statistics over blog posts.
//!
//! Every function is a single pass over a borrowed slice. The input is never
//! mutated or reordered, and nothing is kept between calls.
//!
//! Ties are resolved in favour of whatever was seen first: the earliest post
//! for [`favorite_blog`], and the author who first appeared in the input for
//! [`most_blogs`] and [`most_likes`].
//!
//! Like counts saturate at `u64::MAX` instead of overflowing. Authors whose
//! totals both saturate are tied, so the first one seen keeps the lead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::post::BlogPost;

/// The `{title, author, likes}` projection of the most liked post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteBlog {
    pub title: String,
    pub author: Option<String>,
    pub likes: u64,
}

impl From<&BlogPost> for FavoriteBlog {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            likes: post.likes,
        }
    }
}

/// Author with the most posts. `author` is `None` for an empty list, or when
/// the leading group is the posts without an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    pub author: Option<String>,
    pub blogs: usize,
}

/// Author whose posts collected the most likes in total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: Option<String>,
    pub likes: u64,
}

/// Sum of likes across all posts, saturating at `u64::MAX`.
pub fn total_likes(posts: &[BlogPost]) -> u64 {
    posts
        .iter()
        .fold(0, |total, post| total.saturating_add(post.likes))
}

/// Most liked post, or `None` when there are no posts.
pub fn favorite_blog(posts: &[BlogPost]) -> Option<FavoriteBlog> {
    posts
        .iter()
        .fold(None, |best: Option<&BlogPost>, post| match best {
            Some(current) if current.likes >= post.likes => Some(current),
            _ => Some(post),
        })
        .map(FavoriteBlog::from)
}

/// Author with the highest number of posts.
pub fn most_blogs(posts: &[BlogPost]) -> AuthorBlogs {
    match leader(tally_by_author(posts, |_| 1usize, usize::saturating_add)) {
        Some((author, blogs)) => AuthorBlogs {
            author: author.map(str::to_owned),
            blogs,
        },
        None => AuthorBlogs::default(),
    }
}

/// Author with the highest sum of likes.
pub fn most_likes(posts: &[BlogPost]) -> AuthorLikes {
    match leader(tally_by_author(posts, |post| post.likes, u64::saturating_add)) {
        Some((author, likes)) => AuthorLikes {
            author: author.map(str::to_owned),
            likes,
        },
        None => AuthorLikes::default(),
    }
}

/// Accumulates `weight` per author with `combine`. Groups come back in the
/// order their author first appeared.
fn tally_by_author<'a, T, F>(
    posts: &'a [BlogPost],
    weight: F,
    combine: fn(T, T) -> T,
) -> Vec<(Option<&'a str>, T)>
where
    T: Copy,
    F: Fn(&BlogPost) -> T,
{
    let mut slots: HashMap<Option<&'a str>, usize> = HashMap::new();
    let mut groups: Vec<(Option<&'a str>, T)> = Vec::new();

    for post in posts {
        let author = post.author.as_deref();
        let value = weight(post);
        match slots.get(&author) {
            Some(&slot) => groups[slot].1 = combine(groups[slot].1, value),
            None => {
                slots.insert(author, groups.len());
                groups.push((author, value));
            }
        }
    }

    groups
}

/// First group holding the maximum value. A later group only takes over
/// when strictly greater.
fn leader<'a, T>(groups: Vec<(Option<&'a str>, T)>) -> Option<(Option<&'a str>, T)>
where
    T: PartialOrd + Copy,
{
    groups.into_iter().fold(None, |best, group| match best {
        Some(current) if current.1 >= group.1 => Some(current),
        _ => Some(group),
    })
}
