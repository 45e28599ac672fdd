//! Post Entity

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, PostId, UserId};

use crate::domain::value_object::text::required_text;
use crate::error::ForumResult;

/// Column width of `posts.title`
pub const TITLE_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        title: &str,
        content: &str,
        author_id: UserId,
        category_id: CategoryId,
    ) -> ForumResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: PostId::new(),
            title: required_text("Title", title, Some(TITLE_MAX_LENGTH))?,
            content: required_text("Content", content, None)?,
            author_id,
            category_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn edit(&mut self, title: &str, content: &str) -> ForumResult<()> {
        self.title = required_text("Title", title, Some(TITLE_MAX_LENGTH))?;
        self.content = required_text("Content", content, None)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_validates_fields() {
        let author = UserId::new();
        let category = CategoryId::new();

        assert!(Post::new("Hello", "World", author, category).is_ok());
        assert!(Post::new("  ", "World", author, category).is_err());
        assert!(Post::new("Hello", "", author, category).is_err());
        assert!(Post::new(&"t".repeat(TITLE_MAX_LENGTH + 1), "x", author, category).is_err());
    }

    #[test]
    fn test_edit_keeps_identity() {
        let author = UserId::new();
        let mut post = Post::new("a", "b", author, CategoryId::new()).unwrap();
        let id = post.id;

        post.edit("c", "d").unwrap();

        assert_eq!(post.id, id);
        assert_eq!(post.title, "c");
        assert!(post.is_authored_by(author));
        assert!(post.edit("", "d").is_err());
    }
}
