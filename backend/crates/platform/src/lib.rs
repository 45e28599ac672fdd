//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, SHA-1 hex digests)
//! - Password hashing (bcrypt)
//! - Cookie and bearer-token header handling
//! - Avatar image host client (Cloudinary)

pub mod cookie;
pub mod crypto;
pub mod image_host;
pub mod password;
