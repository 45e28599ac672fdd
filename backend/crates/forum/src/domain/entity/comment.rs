//! Comment Entity

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, UserId};

use crate::domain::value_object::text::required_text;
use crate::error::ForumResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(content: &str, author_id: UserId, post_id: PostId) -> ForumResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: CommentId::new(),
            content: required_text("Content", content, None)?,
            author_id,
            post_id,
            created_at: now,
            updated_at: now,
        })
    }
}
