//! Comment Service

use std::sync::Arc;

use kernel::id::PostId;

use crate::application::resolve_caller;
use crate::domain::entity::Comment;
use crate::domain::repository::{CommentRepository, PostRepository, UserRepository};
use crate::error::{ForumError, ForumResult};

pub struct CommentService<R>
where
    R: CommentRepository + PostRepository + UserRepository,
{
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: CommentRepository + PostRepository + UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_for_post(&self, post_id: PostId) -> ForumResult<Vec<Comment>> {
        self.repo.list_comments_for_post(post_id).await
    }

    pub async fn create(&self, caller: &str, post_id: PostId, content: &str) -> ForumResult<Comment> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(ForumError::not_found("Post not found"));
        }

        let author = resolve_caller(self.repo.as_ref(), caller).await?;
        let comment = Comment::new(content, author.id, post_id)?;

        self.repo.create_comment(&comment).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        Ok(comment)
    }
}
