// file: src/models/post.rs
// description: post draft, publish status and publishing api payloads
// reference: https://developer.wordpress.org/rest-api/reference/posts/

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
    Future,
}

impl PostStatus {
    /// Case-insensitive parse; anything unrecognised is a draft.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "publish" => PostStatus::Publish,
            "future" => PostStatus::Future,
            _ => PostStatus::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Future => "future",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PostStatus::Publish => "published",
            PostStatus::Draft => "saved as draft",
            PostStatus::Future => "scheduled",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved post, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub body_html: String,
    pub status: PostStatus,
    pub scheduled_at: Option<String>,
    pub category_id: Option<u64>,
}

impl PostDraft {
    pub fn to_request(&self) -> NewPost {
        NewPost {
            title: self.title.clone(),
            content: self.body_html.clone(),
            status: self.status,
            date: self.scheduled_at.clone(),
            categories: self.category_id.map(|id| vec![id]),
        }
    }
}

/// JSON body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPost {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}
