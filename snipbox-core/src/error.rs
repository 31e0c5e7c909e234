/// Errors produced by the `snipbox-core` crate and its store implementations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A project field failed validation.
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// No record owned by the caller matched the given identifier.
    #[error("record not found")]
    NotFound,

    /// The backing store failed (connection loss, poisoned lock, bad row).
    #[error("storage error: {0}")]
    Storage(String),

    /// Password hashing or verification failed for a reason other than a mismatch.
    #[error("credential error: {0}")]
    Credential(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] on `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }
}
