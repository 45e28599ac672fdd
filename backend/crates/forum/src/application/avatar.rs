//! Avatar Service
//!
//! Pushes profile pictures to the image host and keeps `users.avatar_url`
//! in step with it.

use std::sync::Arc;

use platform::image_host::ImageHost;

use crate::domain::repository::UserRepository;
use crate::error::{ForumError, ForumResult};

/// Largest accepted upload (5 MiB)
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

pub struct AvatarUpload {
    pub username: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct AvatarService<R, I>
where
    R: UserRepository,
    I: ImageHost,
{
    repo: Arc<R>,
    host: Option<Arc<I>>,
}

impl<R, I> AvatarService<R, I>
where
    R: UserRepository,
    I: ImageHost,
{
    pub fn new(repo: Arc<R>, host: Option<Arc<I>>) -> Self {
        Self { repo, host }
    }

    /// Upload and record a new avatar; returns its public URL.
    pub async fn upload(&self, caller: &str, upload: AvatarUpload) -> ForumResult<String> {
        ensure_self(caller, &upload.username)?;

        if upload.bytes.len() > MAX_AVATAR_BYTES {
            return Err(ForumError::validation("File size too large (max 5MB)"));
        }

        if !is_image(&upload.content_type) {
            return Err(ForumError::validation("File must be an image"));
        }

        let host = self.host()?;
        let url = host
            .upload_avatar(&upload.username, upload.bytes, &upload.content_type)
            .await?;

        if !self.repo.set_avatar_url(&upload.username, Some(&url)).await? {
            return Err(ForumError::not_found("User not found"));
        }

        tracing::info!(username = %upload.username, "Avatar uploaded");

        Ok(url)
    }

    pub async fn delete(&self, caller: &str, username: &str) -> ForumResult<()> {
        ensure_self(caller, username)?;

        let host = self.host()?;
        host.delete_avatar(username).await?;

        if !self.repo.set_avatar_url(username, None).await? {
            return Err(ForumError::not_found("User not found"));
        }

        tracing::info!(username = %username, "Avatar deleted");

        Ok(())
    }

    fn host(&self) -> ForumResult<&I> {
        self.host
            .as_deref()
            .ok_or(ForumError::ImageHostUnavailable)
    }
}

/// `image/<subtype>` that the multipart encoder will also accept
fn is_image(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::IMAGE && !m.subtype().as_str().is_empty())
}

fn ensure_self(caller: &str, username: &str) -> ForumResult<()> {
    if caller != username {
        return Err(ForumError::forbidden("You can only change your own avatar"));
    }
    Ok(())
}
