use serde::{Deserialize, Serialize};

/// A blog post as seen by the list statistics.
///
/// Deserialization is tolerant: a missing `likes` counts as zero and a
/// missing or null `author` is kept as `None`. Posts without an author are
/// still grouped (under `None`) by the per-author statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub likes: u64,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, author: impl Into<String>, likes: u64) -> Self {
        Self {
            author: Some(author.into()),
            title: title.into(),
            likes,
        }
    }

    /// Post with no recorded author.
    pub fn anonymous(title: impl Into<String>, likes: u64) -> Self {
        Self {
            author: None,
            title: title.into(),
            likes,
        }
    }
}
