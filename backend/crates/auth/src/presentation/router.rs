//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::credential::CredentialVerifier;
use crate::domain::repository::CredentialRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::SessionState;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, session: SessionState) -> Router {
    auth_router_generic(repo, session)
}

/// Create a generic Auth router for any repository implementation
///
/// All routes are public: `/login`, `/logout`, `/auth/sync`.
pub fn auth_router_generic<R>(repo: R, session: SessionState) -> Router
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let verifier = CredentialVerifier::new(session.config.bcrypt_cost);
    let state = AuthAppState {
        repo: Arc::new(repo),
        session,
        verifier: Arc::new(verifier),
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/auth/sync", post(handlers::sync_token::<R>))
        .with_state(state)
}
