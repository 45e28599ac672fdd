//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credential;
pub mod sign_in;
pub mod sync_token;
pub mod token;

// Re-exports
pub use config::{AuthConfig, AuthConfigError};
pub use credential::CredentialVerifier;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sync_token::{SyncTokenOutput, SyncTokenUseCase};
pub use token::{SessionClaims, TokenCodec};
