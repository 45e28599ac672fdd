//! Tests for the auth crate
//!
//! HTTP scenarios drive the router in-process with `tower::ServiceExt::oneshot`
//! against an in-memory credential store.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use kernel::id::UserId;
    use platform::password::{ClearTextPassword, MIN_COST};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::credential::Credential;
    use crate::domain::repository::CredentialRepository;
    use crate::error::AuthResult;
    use crate::presentation::middleware::{CurrentUser, SessionState, require_session};
    use crate::presentation::router::auth_router_generic;

    #[derive(Clone, Default)]
    pub struct InMemoryCredentials {
        users: Arc<Mutex<HashMap<String, Credential>>>,
    }

    impl InMemoryCredentials {
        pub fn with_user(username: &str, password: &str) -> Self {
            let repo = Self::default();
            let password_hash = ClearTextPassword::from_login(password.to_string())
                .hash(MIN_COST)
                .unwrap();
            repo.users.lock().unwrap().insert(
                username.to_string(),
                Credential {
                    user_id: UserId::new(),
                    username: username.to_string(),
                    email: format!("{}@example.com", username),
                    avatar_url: None,
                    password_hash,
                },
            );
            repo
        }
    }

    impl CredentialRepository for InMemoryCredentials {
        async fn find_by_username(&self, username: &str) -> AuthResult<Option<Credential>> {
            Ok(self.users.lock().unwrap().get(username).cloned())
        }
    }

    pub fn session() -> SessionState {
        SessionState::new(AuthConfig::with_random_secret().with_bcrypt_cost(MIN_COST))
    }

    /// Auth routes plus one protected `/me` route echoing the caller
    pub fn app(repo: InMemoryCredentials, session: SessionState) -> Router {
        let protected = Router::new()
            .route("/me", get(|user: CurrentUser| async move { user.username }))
            .route_layer(from_fn_with_state(session.clone(), require_session));

        Router::new()
            .merge(auth_router_generic(repo, session))
            .merge(protected)
    }

    pub fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    pub fn cookie_pair(response: &Response<Body>) -> Option<String> {
        let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(|s| s.to_string())
    }
}

#[cfg(test)]
mod codec_tests {
    use chrono::{TimeDelta, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use crate::application::config::AuthConfig;
    use crate::application::token::{SessionClaims, TokenCodec};
    use crate::error::AuthError;

    const BASE64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    #[test]
    fn test_roundtrip_for_many_subjects() {
        let codec = TokenCodec::new(&AuthConfig::with_random_secret());
        let long = "x".repeat(500);
        for subject in ["alice", "bob smith", "名前", "", "a.b-c_d+e@f", long.as_str()] {
            let token = codec.issue(subject).unwrap();
            assert_eq!(codec.verify(&token).unwrap(), subject);
        }
    }

    #[test]
    fn test_any_signature_mutation_fails() {
        let codec = TokenCodec::new(&AuthConfig::with_random_secret());
        let token = codec.issue("alice").unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            let pos = BASE64URL.iter().position(|&c| c == bytes[i]).unwrap();
            // Flip the top bit of the 6-bit group so the decoded bytes change too
            bytes[i] = BASE64URL[pos ^ 0b10_0000];
            let tampered = String::from_utf8(bytes).unwrap();

            assert!(
                matches!(codec.verify(&tampered), Err(AuthError::InvalidOrExpiredToken)),
                "mutation at {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_payload_swap_fails() {
        let codec = TokenCodec::new(&AuthConfig::with_random_secret());
        let alice = codec.issue("alice").unwrap();
        let mallory = codec.issue("mallory").unwrap();

        let alice_parts: Vec<&str> = alice.split('.').collect();
        let mallory_parts: Vec<&str> = mallory.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], mallory_parts[1], alice_parts[2]);

        assert!(codec.verify(&forged).is_err());
    }

    #[test]
    fn test_expired_token_error_matches_malformed() {
        let codec = TokenCodec::new(&AuthConfig::with_random_secret());
        let issued = Utc::now();
        let token = codec.issue_at("alice", issued).unwrap();
        let later = issued + TimeDelta::seconds(codec.ttl().as_secs() as i64 + 1);

        let expired = codec.verify_at(&token, later).unwrap_err();
        let malformed = codec.verify_at("not-a-token", issued).unwrap_err();

        assert!(matches!(expired, AuthError::InvalidOrExpiredToken));
        assert!(matches!(malformed, AuthError::InvalidOrExpiredToken));
        assert_eq!(expired.to_string(), malformed.to_string());
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let config = AuthConfig::with_random_secret();
        let codec = TokenCodec::new(&config);
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "alice".into(),
            iat: now,
            exp: now + 3600,
        };

        let hs384 = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(config.signing_secret()),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&hs384),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_alg_none_is_rejected() {
        let codec = TokenCodec::new(&AuthConfig::with_random_secret());
        let genuine = codec.issue("alice").unwrap();
        let payload = genuine.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let none_header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        for forged in [
            format!("{}.{}.", none_header, payload),
            format!("{}.{}", none_header, payload),
        ] {
            assert!(codec.verify(&forged).is_err());
        }
    }

    #[test]
    fn test_missing_exp_is_rejected() {
        #[derive(serde::Serialize)]
        struct NoExp {
            sub: String,
            iat: i64,
        }

        let config = AuthConfig::with_random_secret();
        let codec = TokenCodec::new(&config);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                sub: "alice".into(),
                iat: Utc::now().timestamp(),
            },
            &EncodingKey::from_secret(config.signing_secret()),
        )
        .unwrap();

        assert!(codec.verify(&token).is_err());
    }
}

#[cfg(test)]
mod scenario_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{TimeDelta, Utc};

    use super::support::*;

    #[tokio::test]
    async fn scenario_a_login_sets_cookie_and_returns_token() {
        let app = app(InMemoryCredentials::with_user("alice", "correct"), session());

        let response = send(
            &app,
            post_json("/login", r#"{"username":"alice","password":"correct"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Secure"));
        assert!(set_cookie.contains("SameSite=None"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=86400"));

        let body = body_json(response).await;
        let token = body["token"].as_str().unwrap();
        assert!(!token.is_empty());
        assert!(set_cookie.starts_with(&format!("token={};", token)));
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn scenario_a_accepts_secret_alias() {
        let app = app(InMemoryCredentials::with_user("alice", "correct"), session());
        let response = send(
            &app,
            post_json("/login", r#"{"username":"alice","secret":"correct"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn scenario_b_wrong_secret_is_401_without_cookie() {
        let app = app(InMemoryCredentials::with_user("alice", "correct"), session());

        let response = send(
            &app,
            post_json("/login", r#"{"username":"alice","password":"wrong"}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn scenario_b_unknown_user_is_indistinguishable() {
        let app = app(InMemoryCredentials::with_user("alice", "correct"), session());

        let wrong_pw = send(
            &app,
            post_json("/login", r#"{"username":"alice","password":"wrong"}"#),
        )
        .await;
        let no_user = send(
            &app,
            post_json("/login", r#"{"username":"nobody","password":"correct"}"#),
        )
        .await;

        assert_eq!(wrong_pw.status(), no_user.status());
        assert!(no_user.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(wrong_pw).await, body_json(no_user).await);
    }

    #[tokio::test]
    async fn malformed_login_body_is_400() {
        let app = app(InMemoryCredentials::default(), session());

        let response = send(&app, post_json("/login", r#"{"username":"alice"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid login data");

        let response = send(&app, post_json("/login", "not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scenario_c_expired_cookie_is_rejected() {
        let session = session();
        let app = app(InMemoryCredentials::default(), session.clone());
        let stale = session
            .codec
            .issue_at("alice", Utc::now() - TimeDelta::hours(25))
            .unwrap();

        let response = send(&app, get_with_cookie("/me", &format!("token={}", stale))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Invalid or expired token" }));
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let app = app(InMemoryCredentials::default(), session());

        let response = send(
            &app,
            Request::builder().uri("/me").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"],
            "Authentication token missing"
        );
    }

    #[tokio::test]
    async fn bearer_header_is_accepted() {
        let session = session();
        let app = app(InMemoryCredentials::default(), session.clone());
        let token = session.codec.issue("alice").unwrap();

        let response = send(
            &app,
            Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "alice");
    }

    #[tokio::test]
    async fn scenario_d_logout_clears_session() {
        let app = app(InMemoryCredentials::with_user("alice", "correct"), session());

        let login = send(
            &app,
            post_json("/login", r#"{"username":"alice","password":"correct"}"#),
        )
        .await;
        let session_cookie = cookie_pair(&login).unwrap();

        let me = send(&app, get_with_cookie("/me", &session_cookie)).await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(body_text(me).await, "alice");

        let logout = send(&app, post_json("/logout", "")).await;
        assert_eq!(logout.status(), StatusCode::OK);
        let set_cookie = logout
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("Max-Age=0"));
        let cleared = cookie_pair(&logout).unwrap();
        assert_eq!(cleared, "token=");

        let after = send(&app, get_with_cookie("/me", &cleared)).await;
        assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sync_sets_cookie_for_valid_token() {
        let session = session();
        let app = app(InMemoryCredentials::default(), session.clone());
        let token = session.codec.issue("alice").unwrap();

        let response = send(
            &app,
            post_json("/auth/sync", &format!(r#"{{"token":"{}"}}"#, token)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(cookie_pair(&response).unwrap(), format!("token={}", token));
        assert_eq!(
            body_json(response).await["message"],
            "Token synchronized successfully"
        );
    }

    #[tokio::test]
    async fn sync_cookie_expires_with_the_token() {
        let session = session();
        let app = app(InMemoryCredentials::default(), session.clone());
        let token = session
            .codec
            .issue_at("alice", Utc::now() - TimeDelta::hours(23))
            .unwrap();

        let response = send(
            &app,
            post_json("/auth/sync", &format!(r#"{{"token":"{}"}}"#, token)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let max_age: i64 = set_cookie
            .rsplit("Max-Age=")
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((3595..=3600).contains(&max_age), "{set_cookie}");
    }

    #[tokio::test]
    async fn sync_rejects_invalid_and_malformed() {
        let app = app(InMemoryCredentials::default(), session());

        let invalid = send(&app, post_json("/auth/sync", r#"{"token":"garbage"}"#)).await;
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert!(invalid.headers().get(header::SET_COOKIE).is_none());

        let foreign = session().codec.issue("alice").unwrap();
        let response = send(
            &app,
            post_json("/auth/sync", &format!(r#"{{"token":"{}"}}"#, foreign)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let malformed = send(&app, post_json("/auth/sync", r#"{"tok":1}"#)).await;
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    }
}
