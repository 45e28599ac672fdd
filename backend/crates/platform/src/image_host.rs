//! Avatar image hosting
//!
//! [`ImageHost`] is the seam the forum crate uploads avatars through.
//! [`CloudinaryClient`] implements it against Cloudinary's signed upload API.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::crypto::sha1_hex;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const AVATAR_FOLDER: &str = "avatars";
const AVATAR_TRANSFORMATION: &str = "w_200,h_200,c_fill,q_auto,f_auto";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Image host returned an unexpected response")]
    MalformedResponse,
}

// ============================================================================
// Trait
// ============================================================================

#[trait_variant::make(ImageHost: Send)]
pub trait LocalImageHost {
    /// Store `bytes` as the avatar of `username`, replacing any previous one.
    /// Returns the public HTTPS URL.
    async fn upload_avatar(
        &self,
        username: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ImageHostError>;

    async fn delete_avatar(&self, username: &str) -> Result<(), ImageHostError>;
}

/// Make a username safe to embed in a public id
pub fn sanitize_username(username: &str) -> String {
    username.replace(' ', "_")
}

// ============================================================================
// Cloudinary
// ============================================================================

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.config.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.config.api_secret)
    }

    async fn send(&self, action: &str, form: Form) -> Result<reqwest::Response, ImageHostError> {
        let response = self.http.post(self.endpoint(action)).multipart(form).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());

        Err(ImageHostError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl ImageHost for CloudinaryClient {
    async fn upload_avatar(
        &self,
        username: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ImageHostError> {
        let public_id = format!("{}_avatar", sanitize_username(username));
        let timestamp = unix_timestamp().to_string();
        let signature = self.sign(&[
            ("folder", AVATAR_FOLDER),
            ("overwrite", "true"),
            ("public_id", &public_id),
            ("timestamp", &timestamp),
            ("transformation", AVATAR_TRANSFORMATION),
        ]);

        let file = Part::bytes(bytes)
            .file_name(public_id.clone())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", AVATAR_FOLDER)
            .text("overwrite", "true")
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("transformation", AVATAR_TRANSFORMATION)
            .text("signature", signature);

        let uploaded: UploadResponse = self
            .send("upload", form)
            .await?
            .json()
            .await
            .map_err(|_| ImageHostError::MalformedResponse)?;

        tracing::debug!(username, url = %uploaded.secure_url, "Avatar uploaded");
        Ok(uploaded.secure_url)
    }

    async fn delete_avatar(&self, username: &str) -> Result<(), ImageHostError> {
        let public_id = format!("{}/{}_avatar", AVATAR_FOLDER, sanitize_username(username));
        let timestamp = unix_timestamp().to_string();
        let signature = self.sign(&[("public_id", &public_id), ("timestamp", &timestamp)]);

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("signature", signature);

        let destroyed: DestroyResponse = self
            .send("destroy", form)
            .await?
            .json()
            .await
            .map_err(|_| ImageHostError::MalformedResponse)?;

        // "not found" means there was nothing to delete
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(ImageHostError::Rejected {
                status: 200,
                message: other.to_string(),
            }),
        }
    }
}

/// Cloudinary request signature
///
/// SHA-1 hex of `k1=v1&k2=v2...` (keys sorted, empty values skipped)
/// immediately followed by the API secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    sha1_hex(format!("{}{}", joined, api_secret).as_bytes())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("jane doe"), "jane_doe");
        assert_eq!(sanitize_username("alice"), "alice");
    }

    #[test]
    fn test_signature_sorts_parameters() {
        let secret = "abcd";
        let forward = sign_params(&[("public_id", "x"), ("timestamp", "1")], secret);
        let reverse = sign_params(&[("timestamp", "1"), ("public_id", "x")], secret);

        assert_eq!(forward, reverse);
        assert_eq!(forward, sha1_hex(b"public_id=x&timestamp=1abcd"));
    }

    #[test]
    fn test_signature_skips_empty_values() {
        let with_empty = sign_params(&[("folder", ""), ("timestamp", "1")], "s");
        assert_eq!(with_empty, sha1_hex(b"timestamp=1s"));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "very-secret".into(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("demo"));
    }
}
