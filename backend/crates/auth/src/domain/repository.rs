//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::credential::Credential;
use crate::error::AuthResult;

/// Credential lookup for login
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find by exact username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Credential>>;
}
