//! Records stored by the server and the JSON bodies its API accepts.

use bloglist_core::BlogPost;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

pub const TITLE_MIN_LEN: usize = 3;
pub const URL_MIN_LEN: usize = 6;
pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 3;

/// A stored blog. `user` is the owner's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub user: Option<String>,
}

impl From<&Blog> for BlogPost {
    fn from(blog: &Blog) -> Self {
        BlogPost {
            author: blog.author.clone(),
            title: blog.title.clone(),
            likes: blog.likes,
        }
    }
}

/// Blog listing entry with its owner expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogWithUser {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// User record stored in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User listing entry with the blogs they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithBlogs {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogRef {
    pub id: String,
    pub title: String,
    pub url: String,
    pub likes: u64,
}

/// Session token for authenticated requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/blogs body. Every field is optional on the wire so missing
/// ones surface as validation errors instead of JSON rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

/// A `NewBlog` that passed validation.
#[derive(Debug, Clone)]
pub struct BlogDraft {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

impl NewBlog {
    pub fn validate(self) -> Result<BlogDraft> {
        let title = required("title", self.title, TITLE_MIN_LEN)?;
        let url = required("url", self.url, URL_MIN_LEN)?;

        Ok(BlogDraft {
            title,
            author: self.author.filter(|a| !a.is_empty()),
            url,
            likes: self.likes.unwrap_or(0),
        })
    }
}

/// PUT /api/blogs/{id} body
#[derive(Debug, Clone, Deserialize)]
pub struct LikesUpdate {
    pub likes: u64,
}

/// POST /api/users body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

impl NewUser {
    pub fn validate(self) -> Result<UserDraft> {
        let password = match self.password {
            Some(p) => p,
            None => return Err(Error::Validation("Must provide password".to_string())),
        };
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(Error::Validation(
                "Password must be longer than 2 characters".to_string(),
            ));
        }

        let username = required("username", self.username, USERNAME_MIN_LEN)?;

        Ok(UserDraft {
            username,
            name: self.name,
            password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

fn required(field: &str, value: Option<String>, min_len: usize) -> Result<String> {
    match value {
        Some(v) if v.is_empty() => Err(Error::Validation(format!("`{}` is required", field))),
        Some(v) if v.chars().count() < min_len => Err(Error::Validation(format!(
            "`{}` is shorter than the minimum allowed length ({})",
            field, min_len
        ))),
        Some(v) => Ok(v),
        None => Err(Error::Validation(format!("`{}` is required", field))),
    }
}
