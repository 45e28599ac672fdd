//! Repository Traits
//!
//! Persistence ports for the forum. Each aggregate has its own trait so
//! services only ask for what they touch. Method names are distinct across
//! traits since one adapter implements all of them.

use kernel::id::{CategoryId, PostId, TagId, UserId};

use crate::domain::entity::{Category, Comment, Post, Tag, User};
use crate::error::ForumResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. Duplicate username or email is a conflict.
    async fn create_user(&self, user: &User) -> ForumResult<()>;

    async fn find_user(&self, id: UserId) -> ForumResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> ForumResult<Option<User>>;

    /// All users, or only the one named exactly `username`
    async fn list_users(&self, username: Option<&str>) -> ForumResult<Vec<User>>;

    /// Persist username, email, avatar_url and updated_at.
    /// Returns false when the row is gone.
    async fn update_user(&self, user: &User) -> ForumResult<bool>;

    async fn set_avatar_url(&self, username: &str, url: Option<&str>) -> ForumResult<bool>;

    async fn delete_user(&self, id: UserId) -> ForumResult<bool>;
}

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create_post(&self, post: &Post) -> ForumResult<()>;

    async fn find_post(&self, id: PostId) -> ForumResult<Option<Post>>;

    async fn list_posts_by_author(&self, author_id: UserId) -> ForumResult<Vec<Post>>;

    /// Newest first
    async fn list_posts_by_category(
        &self,
        category_id: CategoryId,
        limit: i64,
        offset: i64,
    ) -> ForumResult<Vec<Post>>;

    async fn update_post(&self, post: &Post) -> ForumResult<bool>;

    async fn delete_post(&self, id: PostId) -> ForumResult<bool>;
}

#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    async fn list_categories(&self) -> ForumResult<Vec<Category>>;

    async fn find_category(&self, id: CategoryId) -> ForumResult<Option<Category>>;

    async fn find_category_by_name(&self, name: &str) -> ForumResult<Option<Category>>;
}

#[trait_variant::make(TagRepository: Send)]
pub trait LocalTagRepository {
    async fn list_tags(&self) -> ForumResult<Vec<Tag>>;

    async fn find_tag(&self, id: TagId) -> ForumResult<Option<Tag>>;

    async fn find_tag_by_name(&self, name: &str) -> ForumResult<Option<Tag>>;

    async fn list_tags_for_post(&self, post_id: PostId) -> ForumResult<Vec<Tag>>;

    /// Link a tag to a post. Returns false when already linked.
    async fn attach_tag(&self, post_id: PostId, tag_id: TagId) -> ForumResult<bool>;

    /// Returns false when the link did not exist.
    async fn detach_tag(&self, post_id: PostId, tag_id: TagId) -> ForumResult<bool>;
}

#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create_comment(&self, comment: &Comment) -> ForumResult<()>;

    /// Oldest first
    async fn list_comments_for_post(&self, post_id: PostId) -> ForumResult<Vec<Comment>>;
}

/// Everything the forum router needs from a single storage adapter
pub trait ForumRepository:
    UserRepository
    + PostRepository
    + CategoryRepository
    + TagRepository
    + CommentRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ForumRepository for T where
    T: UserRepository
        + PostRepository
        + CategoryRepository
        + TagRepository
        + CommentRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
