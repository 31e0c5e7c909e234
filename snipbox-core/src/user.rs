//! User directory contract used by login.

use std::future::Future;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::id::UserId;
use crate::password::{dummy_hash, verify_password};
use crate::secret::SecretString;

/// A user account as stored by a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    /// Lower-cased email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Looks up and registers user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by email. Lookups are case-insensitive.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the backend cannot be queried.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError>;

    /// Registers an account, or returns the existing one for that email.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the account cannot be persisted.
    async fn ensure(&self, email: &str, password_hash: &str) -> Result<UserAccount, CoreError>;
}

/// Normalizes an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verifies an email/password pair against `directory`.
///
/// Returns `Ok(None)` for an unknown email or a wrong password; callers must
/// not tell the two apart. Runs Argon2 on the calling thread; async servers
/// should prefer [`authenticate_with`] and a blocking-pool verifier.
///
/// # Errors
/// Propagates storage and hash-format failures.
pub async fn authenticate<D: UserDirectory + ?Sized>(
    directory: &D,
    email: &str,
    password: &SecretString,
) -> Result<Option<UserId>, CoreError> {
    authenticate_with(directory, email, password, |password, hash| async move {
        verify_password(&password, &hash)
    })
    .await
}

/// Like [`authenticate`], with the hash check delegated to `verify`.
///
/// `verify` receives the password and a PHC hash. It is called exactly once
/// per login: with the account's hash, or with [`dummy_hash`] when the email
/// is unknown, so both paths pay the same hashing cost.
///
/// # Errors
/// Propagates storage failures and errors returned by `verify` for a known
/// account.
pub async fn authenticate_with<D, F, Fut>(
    directory: &D,
    email: &str,
    password: &SecretString,
    verify: F,
) -> Result<Option<UserId>, CoreError>
where
    D: UserDirectory + ?Sized,
    F: FnOnce(SecretString, String) -> Fut + Send,
    Fut: Future<Output = Result<bool, CoreError>> + Send,
{
    let Some(account) = directory.find_by_email(&normalize_email(email)).await? else {
        if let Some(hash) = dummy_hash() {
            let _ = verify(password.clone(), hash.to_owned()).await;
        }
        tracing::debug!("login for unknown email");
        return Ok(None);
    };
    if verify(password.clone(), account.password_hash).await? {
        Ok(Some(account.id))
    } else {
        tracing::debug!(user_id = %account.id, "login with wrong password");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
