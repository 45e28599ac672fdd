//! Credential Verifier
//!
//! bcrypt hashing and verification moved off the async workers with
//! `spawn_blocking`.

use std::sync::{Arc, OnceLock};

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::AuthResult;

#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    cost: u32,
    // Compared against when the user does not exist, so a miss costs the
    // same bcrypt round as a wrong password.
    dummy: Arc<OnceLock<Option<HashedPassword>>>,
}

impl CredentialVerifier {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy: Arc::new(OnceLock::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a new password
    pub async fn hash(&self, password: ClearTextPassword) -> AuthResult<HashedPassword> {
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || password.hash(cost)).await??;
        Ok(hashed)
    }

    /// Check `password` against `stored`
    ///
    /// `None` (unknown user) still burns one bcrypt comparison and returns
    /// `false`.
    pub async fn verify(
        &self,
        password: ClearTextPassword,
        stored: Option<HashedPassword>,
    ) -> AuthResult<bool> {
        let cost = self.cost;
        let dummy = Arc::clone(&self.dummy);

        let matched = tokio::task::spawn_blocking(move || match stored {
            Some(hash) => hash.verify(&password),
            None => {
                let dummy = dummy.get_or_init(|| {
                    ClearTextPassword::from_login("dummy-password".to_string())
                        .hash(cost)
                        .ok()
                });
                if let Some(dummy) = dummy {
                    dummy.verify(&password);
                }
                false
            }
        })
        .await?;

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::MIN_COST;

    fn secret(s: &str) -> ClearTextPassword {
        ClearTextPassword::from_login(s.to_string())
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let verifier = CredentialVerifier::new(MIN_COST);
        let hashed = verifier.hash(secret("correct")).await.unwrap();

        assert!(verifier.verify(secret("correct"), Some(hashed.clone())).await.unwrap());
        assert!(!verifier.verify(secret("wrong"), Some(hashed)).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_is_non_deterministic() {
        let verifier = CredentialVerifier::new(MIN_COST);
        let first = verifier.hash(secret("correct")).await.unwrap();
        let second = verifier.hash(secret("correct")).await.unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(verifier.verify(secret("correct"), Some(first)).await.unwrap());
        assert!(verifier.verify(secret("correct"), Some(second)).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_user_never_matches() {
        let verifier = CredentialVerifier::new(MIN_COST);
        assert!(!verifier.verify(secret("dummy-password"), None).await.unwrap());
        assert!(!verifier.verify(secret(""), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_false() {
        let verifier = CredentialVerifier::new(MIN_COST);
        let stored = HashedPassword::from_stored("plaintext-from-a-bad-import");
        assert!(!verifier.verify(secret("plaintext-from-a-bad-import"), Some(stored)).await.unwrap());
    }
}
