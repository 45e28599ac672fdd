//! Router assembly
//!
//! Everything is served under `/api`.

use std::time::Duration;

use auth::{PgAuthRepository, SessionState, auth_router};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use forum::{PgForumRepository, forum_router};
use platform::image_host::CloudinaryClient;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Preflight cache lifetime
const CORS_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 3600);

pub fn build(config: &ServerConfig, pool: PgPool) -> Router {
    let session = SessionState::new(config.auth.clone());
    let image_host = config.cloudinary.clone().map(CloudinaryClient::new);

    let api = api_router(
        auth_router(PgAuthRepository::new(pool.clone()), session.clone()),
        forum_router(PgForumRepository::new(pool), image_host, session),
    );

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins))
}

/// Health check plus the feature routers
pub fn api_router(auth: Router, forum: Router) -> Router {
    Router::new()
        .route("/", get(health))
        .merge(auth)
        .merge(forum)
}

/// GET /api
async fn health() -> Json<Value> {
    Json(json!({ "message": "API is running" }))
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_under_api_prefix() {
        let app = Router::new().nest("/api", api_router(Router::new(), Router::new()));

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"message": "API is running"}));
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_listed_origin() {
        let app = Router::new()
            .nest("/api", api_router(Router::new(), Router::new()))
            .layer(cors_layer(&["http://localhost:3000".to_string()]));

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "2592000");
    }
}
