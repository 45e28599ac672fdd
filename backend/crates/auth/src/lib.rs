//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Credential entity, repository trait
//! - `application/` - Token codec, credential verifier, use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Username + password login issuing an HS256 JWT
//! - Token delivered both as an HttpOnly cookie and in the response body
//! - Session middleware accepting the cookie or an `Authorization: Bearer` header
//! - Token sync (client-held token back into the cookie)
//!
//! ## Security Model
//! - Passwords hashed with bcrypt on the blocking pool
//! - Stateless tokens: no server-side session table, expiry embedded in the token
//! - Every token failure is the same 401, every login failure is the same 401

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, AuthConfigError};
pub use application::credential::CredentialVerifier;
pub use application::token::{SessionClaims, TokenCodec};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{CurrentUser, SessionState, require_session};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::AppError,
    kind::ErrorKind,
};
