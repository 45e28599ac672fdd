//! Sign In Use Case
//!
//! Authenticates a user by username and password and issues a session token.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::credential::CredentialVerifier;
use crate::application::token::TokenCodec;
use crate::domain::entity::credential::Credential;
use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: ClearTextPassword,
}

/// Sign in output
pub struct SignInOutput {
    /// Signed session token for cookie and body
    pub token: String,
    pub credential: Credential,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    codec: Arc<TokenCodec>,
    verifier: Arc<CredentialVerifier>,
}

impl<R> SignInUseCase<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, codec: Arc<TokenCodec>, verifier: Arc<CredentialVerifier>) -> Self {
        Self {
            repo,
            codec,
            verifier,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let credential = self.repo.find_by_username(&input.username).await?;

        // Unknown users still pay for one bcrypt comparison
        let stored = credential.as_ref().map(|c| c.password_hash.clone());
        let matched = self.verifier.verify(input.password, stored).await?;

        let credential = match credential {
            Some(credential) if matched => credential,
            _ => {
                tracing::warn!(username = %input.username, "Failed login");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.codec.issue(&credential.username)?;

        tracing::info!(
            user_id = %credential.user_id,
            username = %credential.username,
            "User signed in"
        );

        Ok(SignInOutput { token, credential })
    }
}
