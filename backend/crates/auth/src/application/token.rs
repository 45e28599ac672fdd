//! Token Codec
//!
//! Stateless HS256 session tokens. Nothing is stored server-side; a token is
//! valid exactly while its signature verifies and `now < exp`.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so the clock can be
//! supplied by the caller (`issue_at` / `verify_at`).

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claims carried by every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username of the authenticated user
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(config.signing_secret()),
            decoding: DecodingKey::from_secret(config.signing_secret()),
            validation,
            ttl: config.token_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid for the configured TTL from now
    pub fn issue(&self, subject: &str) -> AuthResult<String> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {}", e)))
    }

    /// Verify `token` and return its subject
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<String> {
        self.decode_at(token, now).map(|claims| claims.sub)
    }

    /// Decode and fully validate, returning all claims
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(reason = %e, "Token rejected");
            AuthError::InvalidOrExpiredToken
        })?;

        if now.timestamp() >= data.claims.exp {
            tracing::debug!(exp = data.claims.exp, "Token expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        Ok(data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig::with_random_secret())
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();
        assert_eq!(codec.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_claims_carry_iat_and_exp() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue_at("alice", now).unwrap();

        let claims = codec.decode_at(&token, now).unwrap();
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 86_400);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue_at("alice", now).unwrap();

        let just_before = now + TimeDelta::seconds(86_399);
        let at_exp = now + TimeDelta::seconds(86_400);
        assert!(codec.verify_at(&token, just_before).is_ok());
        assert!(matches!(
            codec.verify_at(&token, at_exp),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let token = codec().issue("alice").unwrap();
        assert!(matches!(
            codec().verify(&token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = codec();
        for token in ["", "abc", "a.b.c", "a.b", "....."] {
            assert!(matches!(
                codec.verify(token),
                Err(AuthError::InvalidOrExpiredToken)
            ));
        }
    }
}
