//! Password hashing using Argon2id.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::CoreError;
use crate::secret::SecretString;

/// Hashes `password` into a PHC-format Argon2id string.
///
/// # Errors
/// Returns [`CoreError::Credential`] if the hasher rejects its input.
pub fn hash_password(password: &SecretString) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Credential(format!("hash error: {e}")))
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
/// Returns [`CoreError::Credential`] if the stored hash is malformed.
pub fn verify_password(password: &SecretString, hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::Credential(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(password.expose_secret().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Credential(format!("verify error: {e}"))),
    }
}

/// A valid Argon2id hash of a throwaway password, computed once.
///
/// Logins for unknown emails verify against it so they cost the same as a
/// wrong password. `None` only if hashing itself is broken.
#[must_use]
pub fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password(&SecretString::new("snipbox-unknown-account")).ok())
        .as_deref()
}
