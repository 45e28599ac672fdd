//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, UserName};

/// Registered forum member
///
/// `password_hash` never leaves the server; the presentation layer maps
/// this into a response type without it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: UserName,
        email: Email,
        password_hash: HashedPassword,
        avatar_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            avatar_url: normalize_avatar_url(avatar_url),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a profile edit; the password is not editable here.
    pub fn apply_profile(&mut self, username: UserName, email: Email, avatar_url: Option<String>) {
        self.username = username;
        self.email = email;
        self.avatar_url = normalize_avatar_url(avatar_url);
        self.updated_at = Utc::now();
    }

    pub fn is(&self, username: &str) -> bool {
        self.username == *username
    }
}

/// Blank URLs are stored as NULL
fn normalize_avatar_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            HashedPassword::from_stored("x"),
            Some("  ".into()),
        )
    }

    #[test]
    fn test_blank_avatar_is_none() {
        assert!(sample().avatar_url.is_none());
    }

    #[test]
    fn test_apply_profile_bumps_updated_at() {
        let mut user = sample();
        let before = user.updated_at;
        user.apply_profile(
            UserName::new("alice2").unwrap(),
            Email::new("a2@example.com").unwrap(),
            Some("https://img/a.png".into()),
        );
        assert!(user.is("alice2"));
        assert!(user.updated_at >= before);
        assert_eq!(user.avatar_url.as_deref(), Some("https://img/a.png"));
    }
}
