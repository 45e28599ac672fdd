//! Tag Service

use std::collections::HashSet;
use std::sync::Arc;

use kernel::id::{PostId, TagId};

use crate::domain::entity::Tag;
use crate::domain::repository::{PostRepository, TagRepository};
use crate::error::{ForumError, ForumResult};

pub struct TagService<R>
where
    R: TagRepository + PostRepository,
{
    repo: Arc<R>,
}

impl<R> TagService<R>
where
    R: TagRepository + PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ForumResult<Vec<Tag>> {
        self.repo.list_tags().await
    }

    pub async fn get(&self, id: TagId) -> ForumResult<Tag> {
        self.repo
            .find_tag(id)
            .await?
            .ok_or_else(|| ForumError::not_found("Tag not found"))
    }

    pub async fn list_for_post(&self, post_id: PostId) -> ForumResult<Vec<Tag>> {
        self.repo.list_tags_for_post(post_id).await
    }

    /// Attach existing tags to a post by name.
    ///
    /// Every name is resolved before anything is linked, so an unknown tag
    /// leaves the post untouched. Links that already exist are skipped.
    /// Returns the number of new links.
    pub async fn attach(&self, post_id: PostId, names: &[String]) -> ForumResult<usize> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(ForumError::not_found("Post not found"));
        }

        let mut seen = HashSet::new();
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                return Err(ForumError::validation("Invalid tag data"));
            }
            if !seen.insert(name) {
                continue;
            }
            let tag = self
                .repo
                .find_tag_by_name(name)
                .await?
                .ok_or_else(|| ForumError::not_found(format!("Tag not found: {name}")))?;
            tags.push(tag);
        }

        let mut attached = 0;
        for tag in &tags {
            if self.repo.attach_tag(post_id, tag.id).await? {
                attached += 1;
            }
        }

        tracing::info!(post_id = %post_id, attached, requested = names.len(), "Tags attached");

        Ok(attached)
    }

    pub async fn detach(&self, post_id: PostId, tag_id: TagId) -> ForumResult<()> {
        if !self.repo.detach_tag(post_id, tag_id).await? {
            return Err(ForumError::not_found("Tag not found on post"));
        }

        tracing::info!(post_id = %post_id, tag_id = %tag_id, "Tag detached");

        Ok(())
    }
}
