//! Execution proxy: packages a snippet, calls the runner, and turns every
//! failure into a reportable [`ExecutionOutcome`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::RunnerBackend;
use crate::{ExecutionOutcome, Language, RunOutput, RunnerError, Submission};

/// Forwards snippets to a [`RunnerBackend`].
///
/// Each attempt is bounded by `timeout`. Transport failures and timeouts are
/// retried up to `retries` times; rejections and malformed responses are not,
/// since repeating them would give the same answer.
///
/// # Cancel Safety
/// Cancel safe. Dropping the future drops the in-flight backend call, which
/// aborts the outbound request.
#[derive(Clone)]
pub struct ExecutionProxy {
    backend: Arc<dyn RunnerBackend>,
    timeout: Duration,
    retries: u8,
}

impl std::fmt::Debug for ExecutionProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionProxy")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl ExecutionProxy {
    /// Create a proxy over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn RunnerBackend>, timeout: Duration, retries: u8) -> Self {
        Self { backend, timeout, retries }
    }

    /// Run `source` as `language` with `stdin`.
    ///
    /// Never fails: runner problems come back as [`ExecutionOutcome::Failed`].
    pub async fn execute(&self, language: Language, source: &str, stdin: &str) -> ExecutionOutcome {
        let submission = Submission::single_file(language, source, stdin);
        let started = Instant::now();

        tracing::info!(
            %language,
            source_bytes = source.len(),
            stdin_bytes = stdin.len(),
            "forwarding snippet to runner"
        );

        match self.run_with_retry(&submission).await {
            Ok(output) => {
                tracing::info!(
                    %language,
                    elapsed_ms = started.elapsed().as_millis(),
                    "runner returned output"
                );
                output.into()
            }
            Err(err) => {
                tracing::warn!(
                    %language,
                    elapsed_ms = started.elapsed().as_millis(),
                    error = %err,
                    "runner call failed"
                );
                err.into()
            }
        }
    }

    async fn run_with_retry(&self, submission: &Submission) -> Result<RunOutput, RunnerError> {
        let mut attempt: u8 = 0;
        loop {
            let result = match tokio::time::timeout(self.timeout, self.backend.run(submission)).await {
                Ok(result) => result,
                Err(_) => Err(RunnerError::Timeout(self.timeout)),
            };
            match result {
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!(attempt, error = %err, "retrying runner call");
                }
                other => return other,
            }
        }
    }
}
