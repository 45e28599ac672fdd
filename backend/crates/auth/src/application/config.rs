//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::DEFAULT_COST;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default token lifetime (and cookie Max-Age)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthConfigError {
    #[error("JWT signing secret is missing or empty")]
    MissingSigningSecret,

    #[error("Token TTL must be at least one second")]
    ZeroTokenTtl,
}

/// Auth application configuration
///
/// Built once at startup and shared behind `Arc`.
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// HS256 signing secret
    signing_secret: Vec<u8>,
    /// Token lifetime; also the cookie Max-Age
    pub token_ttl: Duration,
    /// Whether to send the cookie with `Secure`
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// bcrypt work factor for new hashes
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Production defaults around the given signing secret
    pub fn new(signing_secret: impl Into<Vec<u8>>) -> Result<Self, AuthConfigError> {
        let signing_secret = signing_secret.into();
        if signing_secret.is_empty() {
            return Err(AuthConfigError::MissingSigningSecret);
        }

        Ok(Self {
            cookie_name: "token".to_string(),
            signing_secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            bcrypt_cost: DEFAULT_COST,
        })
    }

    /// Create config with a random signing secret
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self {
            cookie_name: "token".to_string(),
            signing_secret: platform::crypto::random_bytes(32),
            token_ttl: DEFAULT_TOKEN_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    /// Create config for development (insecure cookie, SameSite=Lax)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secret()
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Result<Self, AuthConfigError> {
        if ttl.as_secs() == 0 {
            return Err(AuthConfigError::ZeroTokenTtl);
        }
        self.token_ttl = ttl;
        Ok(self)
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn signing_secret(&self) -> &[u8] {
        &self.signing_secret
    }

    /// Token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.token_ttl_secs()),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie_name", &self.cookie_name)
            .field("signing_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
