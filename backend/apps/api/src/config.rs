//! Server Configuration
//!
//! Everything the binary reads from the environment, parsed once at startup.

use std::time::Duration;

use auth::application::config::SameSite;
use axum::http::HeaderValue;
use auth::{AuthConfig, AuthConfigError};
use platform::image_host::CloudinaryConfig;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_FRONTEND_ORIGINS: &str =
    "https://student-hub-frontend.vercel.app,http://localhost:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 10;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthConfigError),
}

#[derive(Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    /// `None` disables avatar uploads
    pub cloudinary: Option<CloudinaryConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let secret = get("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;
        let database_url = get("DATABASE_URL")
            .or_else(|| get("SUPABASE_DATABASE_URL"))
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let min_connections = parse_or(
            "DATABASE_MIN_CONNECTIONS",
            get("DATABASE_MIN_CONNECTIONS"),
            DEFAULT_MIN_CONNECTIONS,
        )?;
        if min_connections > max_connections {
            return Err(ConfigError::InvalidVar {
                name: "DATABASE_MIN_CONNECTIONS",
                reason: format!("exceeds DATABASE_MAX_CONNECTIONS ({max_connections})"),
            });
        }

        let frontend_origins = parse_origins(
            &get("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        )?;

        let ttl_secs = parse_or("JWT_TTL_SECS", get("JWT_TTL_SECS"), DEFAULT_TOKEN_TTL_SECS)?;
        let bcrypt_cost: u32 = parse_or(
            "BCRYPT_COST",
            get("BCRYPT_COST"),
            platform::password::DEFAULT_COST,
        )?;
        if !(platform::password::MIN_COST..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidVar {
                name: "BCRYPT_COST",
                reason: format!("must be between {} and 31", platform::password::MIN_COST),
            });
        }
        let cookie_secure = parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), true)?;

        let mut auth = AuthConfig::new(secret)?
            .with_token_ttl(Duration::from_secs(ttl_secs))?
            .with_bcrypt_cost(bcrypt_cost)
            .with_cookie_secure(cookie_secure);
        // Browsers drop SameSite=None cookies that are not Secure
        if !cookie_secure {
            auth.cookie_same_site = SameSite::Lax;
        }

        let cloudinary = match (
            get("CLOUD_NAME"),
            get("CLOUD_API_KEY"),
            get("CLOUD_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::InvalidVar {
                    name: "CLOUD_NAME",
                    reason: "CLOUD_NAME, CLOUD_API_KEY and CLOUD_API_SECRET must be set together"
                        .to_string(),
                });
            }
        };

        Ok(Self {
            port,
            database_url,
            max_connections,
            min_connections,
            frontend_origins,
            auth,
            cloudinary,
        })
    }
}

/// Credentialed CORS needs explicit origins, so `*` is refused.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(ConfigError::InvalidVar {
                    name: "FRONTEND_ORIGINS",
                    reason: "wildcard origin is not allowed with credentials".to_string(),
                });
            }
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|e| ConfigError::InvalidVar {
                    name: "FRONTEND_ORIGINS",
                    reason: format!("{origin}: {e}"),
                })
        })
        .collect()
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            reason: e.to_string(),
        }),
    }
}
