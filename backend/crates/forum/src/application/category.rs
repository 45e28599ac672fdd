//! Category Service

use std::sync::Arc;

use kernel::id::CategoryId;

use crate::domain::entity::Category;
use crate::domain::repository::CategoryRepository;
use crate::error::{ForumError, ForumResult};

pub struct CategoryService<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ForumResult<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn get(&self, id: CategoryId) -> ForumResult<Category> {
        self.repo
            .find_category(id)
            .await?
            .ok_or_else(|| ForumError::not_found("Category not found"))
    }
}
