// Blog data types.
// Posts, anonymous comments, and the form payloads that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FolioError, Result};

pub type PostId = Uuid;
pub type CommentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Anonymous comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewPost {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FolioError::InvalidInput("post title is empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(FolioError::InvalidInput("post content is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub text: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(FolioError::InvalidInput("comment text is empty".to_string()));
        }
        Ok(())
    }
}
