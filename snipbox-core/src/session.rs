//! Session store contract and token helpers.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::id::UserId;
use crate::secret::SecretString;

/// Lifetime of a session from the moment it is issued, in days.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Number of random bytes behind each session token.
const TOKEN_BYTES: usize = 32;

/// A session as held by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A freshly issued session. The token is only ever seen here and in the
/// caller's cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

/// Persists session-token → user mappings with expiry.
///
/// The auth gate only calls [`SessionStore::resolve`]. Issuing and destroying
/// sessions is reserved for the login and logout handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the owning user for a live session, or `None` if the token is
    /// unknown or expired.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the backend cannot be queried.
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, CoreError>;

    /// Issues a new session for `user_id` that lives for `ttl`.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the session cannot be persisted.
    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<IssuedSession, CoreError>;

    /// Removes a session. Unknown tokens are not an error.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the backend cannot be reached.
    async fn destroy(&self, token: &str) -> Result<(), CoreError>;

    /// Deletes expired sessions and returns how many were removed.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the backend cannot be reached.
    async fn prune_expired(&self) -> Result<u64, CoreError>;
}

/// Lifetime of a session from the moment it is issued.
#[must_use]
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Generates an unguessable URL-safe session token.
#[must_use]
pub fn generate_token() -> SecretString {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    SecretString::new(URL_SAFE_NO_PAD.encode(bytes))
}

/// SHA-256 digest of a token, used as the storage key so a leaked table does
/// not leak live sessions.
#[must_use]
pub fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}
