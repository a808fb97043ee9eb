// Blog storage.
// Async store trait and the in-memory implementation used by the server.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::cache::Clock;
use crate::error::{FolioError, Result};

use super::types::{BlogPost, Comment, NewComment, NewPost, PostId};

/// Storage for posts and their comments.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<BlogPost>>;

    async fn get_post(&self, id: PostId) -> Result<BlogPost>;

    async fn create_post(&self, post: NewPost) -> Result<BlogPost>;

    /// Delete a post together with all of its comments.
    async fn delete_post(&self, id: PostId) -> Result<()>;

    /// Comments on a post, newest first.
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    async fn add_comment(&self, post_id: PostId, comment: NewComment) -> Result<Comment>;
}

#[derive(Default)]
struct Tables {
    posts: Vec<BlogPost>,
    comments: Vec<Comment>,
}

/// Blog store kept in process memory. Contents are lost on restart.
pub struct MemoryBlogStore {
    clock: Arc<dyn Clock>,
    tables: RwLock<Tables>,
}

impl MemoryBlogStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            tables: RwLock::new(Tables::default()),
        }
    }
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

fn post_not_found(id: PostId) -> FolioError {
    FolioError::NotFound(format!("blog post {}", id))
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.posts, |p| p.created_at))
    }

    async fn get_post(&self, id: PostId) -> Result<BlogPost> {
        let tables = self.tables.read().await;
        tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| post_not_found(id))
    }

    async fn create_post(&self, post: NewPost) -> Result<BlogPost> {
        post.validate()?;

        let post = BlogPost {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            created_at: self.clock.now(),
        };

        self.tables.write().await.posts.push(post.clone());
        info!(post_id = %post.id, title = %post.title, "created blog post");
        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(post_not_found(id));
        }

        let comments_before = tables.comments.len();
        tables.comments.retain(|c| c.post_id != id);
        info!(
            post_id = %id,
            comments_removed = comments_before - tables.comments.len(),
            "deleted blog post"
        );
        Ok(())
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        Ok(newest_first(&comments, |c| c.created_at))
    }

    async fn add_comment(&self, post_id: PostId, comment: NewComment) -> Result<Comment> {
        comment.validate()?;

        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(post_not_found(post_id));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            text: comment.text,
            created_at: self.clock.now(),
        };
        tables.comments.push(comment.clone());
        info!(post_id = %post_id, comment_id = %comment.id, "added comment");
        Ok(comment)
    }
}
