//! User Service

use std::sync::Arc;

use auth::CredentialVerifier;
use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::domain::entity::{Post, User};
use crate::domain::repository::{PostRepository, UserRepository};
use crate::domain::value_object::{Email, UserName};
use crate::error::{ForumError, ForumResult};

pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar_url: Option<String>,
}

pub struct UpdateUserInput {
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

pub struct UserService<R>
where
    R: UserRepository + PostRepository,
{
    repo: Arc<R>,
    verifier: Arc<CredentialVerifier>,
}

impl<R> UserService<R>
where
    R: UserRepository + PostRepository,
{
    pub fn new(repo: Arc<R>, verifier: Arc<CredentialVerifier>) -> Self {
        Self { repo, verifier }
    }

    /// Register a new account. The password is hashed before storage.
    pub async fn sign_up(&self, input: SignUpInput) -> ForumResult<User> {
        let username = UserName::new(&input.username)?;
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        if self
            .repo
            .find_user_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(ForumError::Conflict("Username already taken".to_string()));
        }

        let password_hash = self.verifier.hash(password).await?;
        let user = User::new(username, email, password_hash, input.avatar_url);

        self.repo.create_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// All users, or the exact match for `username` when given
    pub async fn list(&self, username: Option<&str>) -> ForumResult<Vec<User>> {
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        self.repo.list_users(username).await
    }

    pub async fn get(&self, id: UserId) -> ForumResult<User> {
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| ForumError::not_found("User not found"))
    }

    /// Edit a profile. Only the account owner may do this.
    pub async fn update(&self, caller: &str, id: UserId, input: UpdateUserInput) -> ForumResult<User> {
        let mut user = self.owned(caller, id).await?;

        let username = UserName::new(&input.username)?;
        let email = Email::new(&input.email)?;
        user.apply_profile(username, email, input.avatar_url);

        if !self.repo.update_user(&user).await? {
            return Err(ForumError::not_found("User not found"));
        }

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    pub async fn delete(&self, caller: &str, id: UserId) -> ForumResult<()> {
        let user = self.owned(caller, id).await?;

        if !self.repo.delete_user(user.id).await? {
            return Err(ForumError::not_found("User not found"));
        }

        tracing::info!(user_id = %user.id, "User deleted");

        Ok(())
    }

    /// Posts authored by the user; unknown users simply have none.
    pub async fn posts_of(&self, id: UserId) -> ForumResult<Vec<Post>> {
        self.repo.list_posts_by_author(id).await
    }

    async fn owned(&self, caller: &str, id: UserId) -> ForumResult<User> {
        let user = self.get(id).await?;
        if !user.is(caller) {
            return Err(ForumError::forbidden("You can only modify your own account"));
        }
        Ok(user)
    }
}
