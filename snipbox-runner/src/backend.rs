//! Runner backend abstraction trait.
//!
//! Allows swapping the HTTP runner for a test double without changing the
//! proxy logic.

use async_trait::async_trait;

use crate::{RunOutput, RunnerError, Submission};

/// Something that can execute a [`Submission`] and report its output.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Cancel Safety
/// Implementations must be cancel safe: dropping the future abandons the
/// outbound call without side effects on the caller.
#[async_trait]
pub trait RunnerBackend: Send + Sync {
    /// Execute one submission.
    ///
    /// # Errors
    /// Returns [`RunnerError::Transport`] if the runner cannot be reached.
    /// Returns [`RunnerError::Rejected`] for a non-success HTTP status.
    /// Returns [`RunnerError::Malformed`] if the response cannot be parsed.
    async fn run(&self, submission: &Submission) -> Result<RunOutput, RunnerError>;
}
