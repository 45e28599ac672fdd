//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::credential::Credential;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    /// Older clients send the password as `secret`
    #[serde(alias = "secret")]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Same value as the cookie, for clients that store it themselves
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<Credential> for UserSummary {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.user_id.to_string(),
            username: credential.username,
            email: credential.email,
            avatar_url: credential.avatar_url,
        }
    }
}

// ============================================================================
// Token sync
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SyncTokenRequest {
    pub token: String,
}

// ============================================================================
// Generic
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
