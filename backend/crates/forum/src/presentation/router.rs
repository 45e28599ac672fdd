//! Forum Router

use std::sync::Arc;

use auth::{CredentialVerifier, SessionState, require_session};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use platform::image_host::{CloudinaryClient, ImageHost};

use crate::application::MAX_AVATAR_BYTES;
use crate::domain::repository::ForumRepository;
use crate::infra::postgres::PgForumRepository;
use crate::presentation::handlers::{self, ForumAppState};

/// Request body cap for avatar uploads; multipart framing on top of the file
const UPLOAD_BODY_LIMIT: usize = MAX_AVATAR_BYTES + 1024 * 1024;

/// Create the Forum router with PostgreSQL repository and Cloudinary
pub fn forum_router(
    repo: PgForumRepository,
    image_host: Option<CloudinaryClient>,
    session: SessionState,
) -> Router {
    forum_router_generic(repo, image_host, session)
}

/// Create a generic Forum router for any repository and image host
///
/// Reads of posts, tags and categories plus sign-up are public. Everything
/// else sits behind the session middleware.
pub fn forum_router_generic<R, I>(repo: R, image_host: Option<I>, session: SessionState) -> Router
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let verifier = CredentialVerifier::new(session.config.bcrypt_cost);
    let state = ForumAppState {
        repo: Arc::new(repo),
        image_host: image_host.map(Arc::new),
        verifier: Arc::new(verifier),
    };

    let public = Router::new()
        .route("/users", post(handlers::create_user::<R, I>))
        .route("/posts/{id}", get(handlers::get_post::<R, I>))
        .route("/tags", get(handlers::list_tags::<R, I>))
        .route("/tags/{id}", get(handlers::get_tag::<R, I>))
        .route("/categories", get(handlers::list_categories::<R, I>))
        .route("/categories/{id}", get(handlers::get_category::<R, I>));

    let protected = Router::new()
        // Users
        .route("/users", get(handlers::list_users::<R, I>))
        .route(
            "/users/{id}",
            get(handlers::get_user::<R, I>)
                .put(handlers::update_user::<R, I>)
                .delete(handlers::delete_user::<R, I>),
        )
        .route("/users/{id}/posts", get(handlers::list_user_posts::<R, I>))
        // Posts
        .route("/posts", post(handlers::create_post::<R, I>))
        .route(
            "/posts/{id}",
            put(handlers::update_post::<R, I>)
                .delete(handlers::delete_post::<R, I>),
        )
        .route(
            "/posts/category/{category}/{page}",
            get(handlers::list_posts_by_category::<R, I>),
        )
        // Tags on posts
        .route(
            "/posts/{id}/tags",
            get(handlers::list_post_tags::<R, I>).post(handlers::add_post_tags::<R, I>),
        )
        .route(
            "/posts/{id}/tags/{tag_id}",
            delete(handlers::remove_post_tag::<R, I>),
        )
        // Comments
        .route(
            "/posts/{id}/comments",
            get(handlers::list_comments::<R, I>).post(handlers::create_comment::<R, I>),
        )
        // Avatars
        .route(
            "/cloudinary/upload",
            post(handlers::upload_avatar::<R, I>).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/cloudinary/upload/{username}",
            delete(handlers::delete_avatar::<R, I>),
        )
        .route_layer(from_fn_with_state(session, require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}
