//! Post Service

use std::sync::Arc;

use kernel::id::{CategoryId, PostId};

use crate::application::resolve_caller;
use crate::domain::entity::Post;
use crate::domain::repository::{CategoryRepository, PostRepository, UserRepository};
use crate::domain::value_object::PageIndex;
use crate::error::{ForumError, ForumResult};

pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub category_id: CategoryId,
}

pub struct UpdatePostInput {
    pub title: String,
    pub content: String,
}

pub struct PostService<R>
where
    R: PostRepository + CategoryRepository + UserRepository,
{
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + CategoryRepository + UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Publish a post as the caller
    pub async fn create(&self, caller: &str, input: CreatePostInput) -> ForumResult<Post> {
        let author = resolve_caller(self.repo.as_ref(), caller).await?;

        if self.repo.find_category(input.category_id).await?.is_none() {
            return Err(ForumError::not_found("Category not found"));
        }

        let post = Post::new(&input.title, &input.content, author.id, input.category_id)?;
        self.repo.create_post(&post).await?;

        tracing::info!(post_id = %post.id, user_id = %author.id, "Post created");

        Ok(post)
    }

    pub async fn get(&self, id: PostId) -> ForumResult<Post> {
        self.repo
            .find_post(id)
            .await?
            .ok_or_else(|| ForumError::not_found("Post not found"))
    }

    /// One page of a category, newest first
    pub async fn list_by_category(&self, name: &str, page: PageIndex) -> ForumResult<Vec<Post>> {
        let category = self
            .repo
            .find_category_by_name(name)
            .await?
            .ok_or_else(|| ForumError::not_found("Category not found"))?;

        self.repo
            .list_posts_by_category(category.id, page.limit(), page.offset())
            .await
    }

    pub async fn update(&self, caller: &str, id: PostId, input: UpdatePostInput) -> ForumResult<Post> {
        let mut post = self.owned(caller, id).await?;
        post.edit(&input.title, &input.content)?;

        if !self.repo.update_post(&post).await? {
            return Err(ForumError::not_found("Post not found"));
        }

        tracing::info!(post_id = %post.id, "Post updated");

        Ok(post)
    }

    pub async fn delete(&self, caller: &str, id: PostId) -> ForumResult<()> {
        let post = self.owned(caller, id).await?;

        if !self.repo.delete_post(post.id).await? {
            return Err(ForumError::not_found("Post not found"));
        }

        tracing::info!(post_id = %post.id, "Post deleted");

        Ok(())
    }

    async fn owned(&self, caller: &str, id: PostId) -> ForumResult<Post> {
        let post = self.get(id).await?;
        let author = resolve_caller(self.repo.as_ref(), caller).await?;

        if !post.is_authored_by(author.id) {
            return Err(ForumError::forbidden("You can only modify your own posts"));
        }
        Ok(post)
    }
}
