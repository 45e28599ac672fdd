//! Session Middleware
//!
//! Resolves the caller from the `token` cookie (or an `Authorization: Bearer`
//! header) and attaches [`CurrentUser`] to the request. Requests without a
//! valid token never reach the handler.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::{extract_bearer_token, extract_cookie};

use crate::application::config::AuthConfig;
use crate::application::token::TokenCodec;
use crate::error::AuthError;

/// Shared, immutable session verification state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

impl SessionState {
    pub fn new(config: AuthConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self {
            codec: Arc::new(codec),
            config: Arc::new(config),
        }
    }
}

/// Identity of the authenticated caller for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
}

/// Cookie first, then bearer header. An empty cookie counts as absent.
pub fn resolve_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_cookie(headers, cookie_name)
        .filter(|value| !value.is_empty())
        .or_else(|| extract_bearer_token(headers))
}

/// Middleware that requires a valid session token
pub async fn require_session(
    State(state): State<SessionState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token =
        resolve_token(req.headers(), &state.config.cookie_name).ok_or(AuthError::MissingToken)?;

    let username = state.codec.verify(&token)?;

    req.extensions_mut().insert(CurrentUser { username });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from-cookie"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(resolve_token(&headers, "token").as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_empty_cookie_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(resolve_token(&headers, "token"), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(resolve_token(&headers, "token").as_deref(), Some("from-header"));
    }
}
