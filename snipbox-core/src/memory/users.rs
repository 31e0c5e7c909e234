use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::poisoned;
use crate::error::CoreError;
use crate::id::UserId;
use crate::user::{normalize_email, UserAccount, UserDirectory};

/// User directory keyed by normalized email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl InMemoryUserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError> {
        Ok(self
            .users
            .read()
            .map_err(poisoned)?
            .get(&normalize_email(email))
            .cloned())
    }

    async fn ensure(&self, email: &str, password_hash: &str) -> Result<UserAccount, CoreError> {
        let email = normalize_email(email);
        let account = self
            .users
            .write()
            .map_err(poisoned)?
            .entry(email.clone())
            .or_insert_with(|| UserAccount {
                id: UserId::new(Uuid::new_v4().to_string()),
                email,
                password_hash: password_hash.to_owned(),
            })
            .clone();
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::password::{dummy_hash, hash_password, verify_password};
    use crate::user::{authenticate, authenticate_with};
    use crate::SecretString;

    #[tokio::test]
    async fn ensure_is_idempotent_per_email() {
        let dir = InMemoryUserDirectory::new();
        let a = match dir.ensure("Ada@Example.com", "hash-1").await {
            Ok(a) => a,
            Err(e) => panic!("ensure failed: {e}"),
        };
        let b = match dir.ensure("ada@example.com", "hash-2").await {
            Ok(b) => b,
            Err(e) => panic!("ensure failed: {e}"),
        };
        assert_eq!(a.id, b.id, "same email must map to the same account");
        assert_eq!(b.password_hash, "hash-1", "existing account is not overwritten");
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let dir = InMemoryUserDirectory::new();
        let password = SecretString::new("s3cret-pass");
        let hash = match hash_password(&password) {
            Ok(h) => h,
            Err(e) => panic!("hash failed: {e}"),
        };
        let account = match dir.ensure("ada@example.com", &hash).await {
            Ok(a) => a,
            Err(e) => panic!("ensure failed: {e}"),
        };

        let ok = authenticate(&dir, " ADA@example.com", &password).await;
        assert!(matches!(ok, Ok(Some(ref id)) if *id == account.id));

        let wrong = authenticate(&dir, "ada@example.com", &SecretString::new("nope")).await;
        assert!(matches!(wrong, Ok(None)));

        let unknown = authenticate(&dir, "bob@example.com", &password).await;
        assert!(matches!(unknown, Ok(None)));
    }

    #[tokio::test]
    async fn unknown_email_still_runs_the_verifier() {
        let dir = InMemoryUserDirectory::new();
        let hash = match hash_password(&SecretString::new("right")) {
            Ok(h) => h,
            Err(e) => panic!("hash failed: {e}"),
        };
        if let Err(e) = dir.ensure("ada@example.com", &hash).await {
            panic!("ensure failed: {e}");
        }

        let seen: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let record = |password: SecretString, hash: String| {
            seen.lock().expect("seen lock").push(hash.clone());
            async move { verify_password(&password, &hash) }
        };

        let unknown =
            authenticate_with(&dir, "bob@example.com", &SecretString::new("right"), record).await;
        assert!(matches!(unknown, Ok(None)));
        let wrong =
            authenticate_with(&dir, "ada@example.com", &SecretString::new("wrong"), record).await;
        assert!(matches!(wrong, Ok(None)));

        let seen = seen.into_inner().expect("seen lock");
        assert_eq!(seen.len(), 2, "both paths must hash exactly once");
        assert_eq!(Some(seen[0].as_str()), dummy_hash(), "unknown email uses the dummy hash");
        assert_eq!(seen[1], hash);
    }
}
