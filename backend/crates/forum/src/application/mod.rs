//! Forum Application Layer
//!
//! One service per resource. Services take the caller's username as
//! resolved by the session middleware and enforce ownership themselves.

pub mod avatar;
pub mod category;
pub mod comment;
pub mod post;
pub mod tag;
pub mod user;

pub use avatar::{AvatarService, AvatarUpload, MAX_AVATAR_BYTES};
pub use category::CategoryService;
pub use comment::CommentService;
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use tag::TagService;
pub use user::{SignUpInput, UpdateUserInput, UserService};

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{ForumError, ForumResult};

/// Load the account behind a verified session.
///
/// A valid token for a deleted or renamed account resolves to nothing.
pub(crate) async fn resolve_caller<R>(repo: &R, caller: &str) -> ForumResult<User>
where
    R: UserRepository,
{
    repo.find_user_by_username(caller)
        .await?
        .ok_or_else(|| ForumError::not_found("User not found"))
}
