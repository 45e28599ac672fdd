//! Forum Backend Module
//!
//! Users, posts, categories, tags, comments and avatars for the student hub.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Services enforcing validation and ownership
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Authentication is delegated to the `auth` crate's session middleware;
//! handlers only see the caller's username.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{ForumError, ForumResult};
pub use infra::postgres::PgForumRepository;
pub use presentation::router::{forum_router, forum_router_generic};
