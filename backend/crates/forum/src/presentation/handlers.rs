//! HTTP Handlers
//!
//! Path ids arrive as strings so a malformed id can be answered with a
//! resource-specific 400 instead of the extractor's generic rejection.

use std::sync::Arc;

use auth::{CredentialVerifier, CurrentUser};
use auth::presentation::dto::MessageResponse;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::Id;
use platform::image_host::ImageHost;

use crate::application::{
    AvatarService, AvatarUpload, CategoryService, CommentService, CreatePostInput, PostService,
    SignUpInput, TagService, UpdatePostInput, UpdateUserInput, UserService,
};
use crate::domain::repository::ForumRepository;
use crate::domain::value_object::PageIndex;
use crate::error::{ForumError, ForumResult};
use crate::presentation::dto::{
    CategoryResponse, CommentResponse, CreateCommentRequest, CreatePostRequest, PostResponse,
    SignUpRequest, TagNameRequest, TagResponse, UpdatePostRequest, UpdateUserRequest,
    UploadResponse, UserListQuery, UserResponse, into_responses,
};

/// Shared state for forum handlers
pub struct ForumAppState<R, I>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    /// `None` when no image host credentials are configured
    pub image_host: Option<Arc<I>>,
    pub verifier: Arc<CredentialVerifier>,
}

impl<R, I> Clone for ForumAppState<R, I>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            image_host: self.image_host.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

fn parse_id<T>(raw: &str, message: &'static str) -> ForumResult<Id<T>> {
    raw.parse::<Id<T>>()
        .map_err(|_| ForumError::validation(message))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>, message: &'static str) -> ForumResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Malformed request body");
        ForumError::validation(message)
    })
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/users
pub async fn create_user<R, I>(
    State(state): State<ForumAppState<R, I>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ForumResult<impl IntoResponse>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let req = json_body(payload, "Invalid user data")?;

    let user = UserService::new(state.repo.clone(), state.verifier.clone())
        .sign_up(SignUpInput {
            username: req.username,
            email: req.email,
            password: req.password,
            avatar_url: req.avatar_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/users?username=
pub async fn list_users<R, I>(
    State(state): State<ForumAppState<R, I>>,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> ForumResult<Json<Vec<UserResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|_| ForumError::validation("Invalid user data"))?;

    let users = UserService::new(state.repo.clone(), state.verifier.clone())
        .list(query.username.as_deref())
        .await?;

    Ok(Json(into_responses(users)))
}

/// GET /api/users/{id}
pub async fn get_user<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<UserResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid user ID")?;
    let user = UserService::new(state.repo.clone(), state.verifier.clone())
        .get(id)
        .await?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id}
pub async fn update_user<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid user ID")?;
    let req = json_body(payload, "Invalid user data")?;

    UserService::new(state.repo.clone(), state.verifier.clone())
        .update(
            &caller.username,
            id,
            UpdateUserInput {
                username: req.username,
                email: req.email,
                avatar_url: req.avatar_url,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// DELETE /api/users/{id}
pub async fn delete_user<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid user ID")?;

    UserService::new(state.repo.clone(), state.verifier.clone())
        .delete(&caller.username, id)
        .await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// GET /api/users/{id}/posts
pub async fn list_user_posts<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<Vec<PostResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid user ID")?;
    let posts = UserService::new(state.repo.clone(), state.verifier.clone())
        .posts_of(id)
        .await?;

    Ok(Json(into_responses(posts)))
}

// ============================================================================
// Posts
// ============================================================================

/// POST /api/posts
pub async fn create_post<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ForumResult<impl IntoResponse>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let req = json_body(payload, "Invalid post data")?;
    let category_id = parse_id(&req.category_id, "Invalid post data")?;

    let post = PostService::new(state.repo.clone())
        .create(
            &caller.username,
            CreatePostInput {
                title: req.title,
                content: req.content,
                category_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// GET /api/posts/{id}
pub async fn get_post<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<PostResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let post = PostService::new(state.repo.clone()).get(id).await?;

    Ok(Json(post.into()))
}

/// GET /api/posts/category/{category}/{page}
pub async fn list_posts_by_category<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path((category, page)): Path<(String, String)>,
) -> ForumResult<Json<Vec<PostResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let page: PageIndex = page.parse()?;
    let posts = PostService::new(state.repo.clone())
        .list_by_category(&category, page)
        .await?;

    Ok(Json(into_responses(posts)))
}

/// PUT /api/posts/{id}
pub async fn update_post<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let req = json_body(payload, "Invalid post data")?;

    PostService::new(state.repo.clone())
        .update(
            &caller.username,
            id,
            UpdatePostInput {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("Post updated successfully")))
}

/// DELETE /api/posts/{id}
pub async fn delete_post<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;

    PostService::new(state.repo.clone())
        .delete(&caller.username, id)
        .await?;

    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

// ============================================================================
// Tags
// ============================================================================

/// GET /api/tags
pub async fn list_tags<R, I>(
    State(state): State<ForumAppState<R, I>>,
) -> ForumResult<Json<Vec<TagResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let tags = TagService::new(state.repo.clone()).list().await?;
    Ok(Json(into_responses(tags)))
}

/// GET /api/tags/{id}
pub async fn get_tag<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<TagResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid tag ID")?;
    let tag = TagService::new(state.repo.clone()).get(id).await?;
    Ok(Json(tag.into()))
}

/// GET /api/posts/{id}/tags
pub async fn list_post_tags<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<Vec<TagResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let tags = TagService::new(state.repo.clone()).list_for_post(id).await?;
    Ok(Json(into_responses(tags)))
}

/// POST /api/posts/{id}/tags
pub async fn add_post_tags<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
    payload: Result<Json<Vec<TagNameRequest>>, JsonRejection>,
) -> ForumResult<impl IntoResponse>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let names: Vec<String> = json_body(payload, "Invalid tag data")?
        .into_iter()
        .map(|tag| tag.name)
        .collect();

    TagService::new(state.repo.clone()).attach(id, &names).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Tags added to post successfully")),
    ))
}

/// DELETE /api/posts/{id}/tags/{tag_id}
pub async fn remove_post_tag<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path((id, tag_id)): Path<(String, String)>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let tag_id = parse_id(&tag_id, "Invalid tag ID")?;

    TagService::new(state.repo.clone()).detach(id, tag_id).await?;

    Ok(Json(MessageResponse::new("Tags removed from post successfully")))
}

// ============================================================================
// Comments
// ============================================================================

/// GET /api/posts/{id}/comments
pub async fn list_comments<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<Vec<CommentResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let comments = CommentService::new(state.repo.clone())
        .list_for_post(id)
        .await?;
    Ok(Json(into_responses(comments)))
}

/// POST /api/posts/{id}/comments
pub async fn create_comment<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ForumResult<impl IntoResponse>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid post ID")?;
    let req = json_body(payload, "Invalid comment data")?;

    let comment = CommentService::new(state.repo.clone())
        .create(&caller.username, id, &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

// ============================================================================
// Categories
// ============================================================================

/// GET /api/categories
pub async fn list_categories<R, I>(
    State(state): State<ForumAppState<R, I>>,
) -> ForumResult<Json<Vec<CategoryResponse>>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let categories = CategoryService::new(state.repo.clone()).list().await?;
    Ok(Json(into_responses(categories)))
}

/// GET /api/categories/{id}
pub async fn get_category<R, I>(
    State(state): State<ForumAppState<R, I>>,
    Path(id): Path<String>,
) -> ForumResult<Json<CategoryResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let id = parse_id(&id, "Invalid category ID")?;
    let category = CategoryService::new(state.repo.clone()).get(id).await?;
    Ok(Json(category.into()))
}

// ============================================================================
// Avatars
// ============================================================================

fn upload_error(err: MultipartError) -> ForumError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ForumError::validation("File size too large (max 5MB)")
    } else {
        tracing::debug!(error = %err.body_text(), "Unreadable multipart body");
        ForumError::validation("Invalid upload data")
    }
}

/// POST /api/cloudinary/upload
///
/// Multipart fields: `file` (the image) and `username` (must be the caller).
pub async fn upload_avatar<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ForumResult<Json<UploadResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    let mut multipart = multipart.map_err(|_| ForumError::validation("No file uploaded"))?;

    let mut file: Option<(Vec<u8>, String)> = None;
    let mut username: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(upload_error)?;
                if !bytes.is_empty() {
                    file = Some((bytes.to_vec(), content_type));
                }
            }
            "username" => {
                let value = field.text().await.map_err(upload_error)?;
                let value = value.trim();
                if !value.is_empty() {
                    username = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (bytes, content_type) = file.ok_or_else(|| ForumError::validation("No file uploaded"))?;
    let username = username.ok_or_else(|| ForumError::validation("Username is required"))?;

    let url = AvatarService::new(state.repo.clone(), state.image_host.clone())
        .upload(
            &caller.username,
            AvatarUpload {
                username,
                bytes,
                content_type,
            },
        )
        .await?;

    Ok(Json(UploadResponse { url }))
}

/// DELETE /api/cloudinary/upload/{username}
pub async fn delete_avatar<R, I>(
    State(state): State<ForumAppState<R, I>>,
    caller: CurrentUser,
    Path(username): Path<String>,
) -> ForumResult<Json<MessageResponse>>
where
    R: ForumRepository,
    I: ImageHost + Send + Sync + 'static,
{
    AvatarService::new(state.repo.clone(), state.image_host.clone())
        .delete(&caller.username, &username)
        .await?;

    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
