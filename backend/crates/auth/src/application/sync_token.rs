//! Sync Token Use Case
//!
//! Lets a client that holds a token (e.g. from local storage) turn it back
//! into the session cookie. The token is re-validated, never re-issued, so
//! its original expiry still applies and the cookie must not outlive it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::token::TokenCodec;
use crate::error::AuthResult;

pub struct SyncTokenOutput {
    pub token: String,
    pub username: String,
    /// Seconds until the token's `exp`; always positive
    pub remaining_secs: i64,
}

pub struct SyncTokenUseCase {
    codec: Arc<TokenCodec>,
}

impl SyncTokenUseCase {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn execute(&self, token: String) -> AuthResult<SyncTokenOutput> {
        self.execute_at(token, Utc::now())
    }

    pub fn execute_at(&self, token: String, now: DateTime<Utc>) -> AuthResult<SyncTokenOutput> {
        let token = token.trim();
        let claims = self.codec.decode_at(token, now)?;

        tracing::debug!(username = %claims.sub, exp = claims.exp, "Token synchronized");

        Ok(SyncTokenOutput {
            token: token.to_string(),
            username: claims.sub,
            remaining_secs: claims.exp - now.timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use chrono::TimeDelta;

    #[test]
    fn test_remaining_lifetime_follows_exp() {
        let codec = Arc::new(TokenCodec::new(&AuthConfig::with_random_secret()));
        let issued = Utc::now();
        let token = codec.issue_at("alice", issued).unwrap();

        let output = SyncTokenUseCase::new(codec)
            .execute_at(token, issued + TimeDelta::hours(23))
            .unwrap();

        assert_eq!(output.username, "alice");
        assert_eq!(output.remaining_secs, 3600);
    }
}
