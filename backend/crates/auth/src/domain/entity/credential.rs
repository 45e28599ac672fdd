//! Credential Entity
//!
//! What login needs to know about a user: identity, profile summary and the
//! stored bcrypt hash. The hash never leaves the auth crate.

use kernel::id::UserId;
use platform::password::HashedPassword;

#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub password_hash: HashedPassword,
}
