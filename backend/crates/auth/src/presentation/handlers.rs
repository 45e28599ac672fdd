//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::{delete_cookie_header, set_cookie_header};
use platform::password::ClearTextPassword;

use crate::application::credential::CredentialVerifier;
use crate::application::{SignInInput, SignInUseCase, SyncTokenUseCase};
use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, LoginResponse, MessageResponse, SyncTokenRequest};
use crate::presentation::middleware::SessionState;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub session: SessionState,
    pub verifier: Arc<CredentialVerifier>,
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Malformed login body");
        AuthError::InvalidRequest("Invalid login data".to_string())
    })?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.session.codec.clone(),
        state.verifier.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            username: req.username,
            password: ClearTextPassword::from_login(req.password),
        })
        .await?;

    let cookie = set_cookie_header(&state.session.config.cookie_config(), &output.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: output.token,
            user: output.credential.into(),
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/logout
///
/// Always succeeds; tokens are stateless so there is nothing to revoke.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let cookie = delete_cookie_header(&state.session.config.cookie_config());

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Successfully logged out")),
    )
}

// ============================================================================
// Token sync
// ============================================================================

/// POST /api/auth/sync
pub async fn sync_token<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<SyncTokenRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let Json(req) =
        payload.map_err(|_| AuthError::InvalidRequest("Invalid token data".to_string()))?;

    let output = SyncTokenUseCase::new(state.session.codec.clone()).execute(req.token)?;

    let mut cookie_config = state.session.config.cookie_config();
    cookie_config.max_age_secs = Some(output.remaining_secs);
    let cookie = set_cookie_header(&cookie_config, &output.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Token synchronized successfully")),
    ))
}
