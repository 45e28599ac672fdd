//! User Name Value Object
//!
//! ユーザー名はログインとアバターの公開IDに使われる公開ハンドル。
//! 既存アカウントとの互換のため大文字小文字は区別し、空白も許可する。
//!
//! ## 不変条件
//! - 前後の空白は除去される
//! - 長さ: 1〜50文字
//! - 制御文字禁止

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ForumError, ForumResult};

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> ForumResult<Self> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(ForumError::validation("Username cannot be empty"));
        }

        let char_count = name.chars().count();
        if char_count > USER_NAME_MAX_LENGTH {
            return Err(ForumError::validation(format!(
                "Username must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(ForumError::validation(
                "Username cannot contain control characters",
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
