//! Error types for the runner crate.

use std::time::Duration;

/// Errors that can occur while talking to the external code runner.
///
/// These never reach an HTTP client as a failure status; the
/// [`ExecutionProxy`](crate::ExecutionProxy) folds them into a failed
/// [`ExecutionOutcome`](crate::ExecutionOutcome).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RunnerError {
    /// The runner could not be reached (DNS, connect, reset).
    #[error("runner unreachable: {0}")]
    Transport(String),

    /// The runner did not answer within the configured timeout.
    #[error("runner timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The runner answered with a non-success HTTP status.
    #[error("runner rejected the submission with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The runner answered 2xx but the body was not `{stdout, stderr}`.
    #[error("malformed runner response: {0}")]
    Malformed(String),

    /// The client could not be built from the given configuration.
    #[error("invalid runner configuration: {0}")]
    Config(String),
}

impl RunnerError {
    /// Whether a second attempt could plausibly succeed without changing the
    /// request. Only transport-level failures qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunnerError::Transport(_) | RunnerError::Timeout(_))
    }
}
