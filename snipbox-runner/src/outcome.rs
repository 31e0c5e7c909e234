//! The result of an execution request as seen by API clients.

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;
use crate::submission::RunOutput;

/// Why an execution produced no program output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum FailureKind {
    /// The runner could not be reached.
    Transport,
    /// The runner did not answer in time.
    Timeout,
    /// The runner refused the submission (non-2xx).
    Rejected,
    /// The runner answered with something other than `{stdout, stderr}`.
    Malformed,
}

/// Outcome of running a snippet.
///
/// `Completed` carries whatever the runner reported, compile errors and
/// non-zero exits included. `Failed` means the runner never produced a
/// result; it is a normal response, not a server error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExecutionOutcome {
    Completed { stdout: String, stderr: String },
    Failed { kind: FailureKind, message: String },
}

impl ExecutionOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { .. })
    }
}

impl From<RunOutput> for ExecutionOutcome {
    fn from(output: RunOutput) -> Self {
        ExecutionOutcome::Completed { stdout: output.stdout, stderr: output.stderr }
    }
}

impl From<RunnerError> for ExecutionOutcome {
    fn from(err: RunnerError) -> Self {
        let kind = match &err {
            RunnerError::Transport(_) | RunnerError::Config(_) => FailureKind::Transport,
            RunnerError::Timeout(_) => FailureKind::Timeout,
            RunnerError::Rejected { .. } => FailureKind::Rejected,
            RunnerError::Malformed(_) => FailureKind::Malformed,
        };
        ExecutionOutcome::Failed { kind, message: format!("Execution failed: {err}") }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn completed_outcome_serializes_with_status_tag() {
        let outcome = ExecutionOutcome::from(RunOutput {
            stdout: "ok\n".to_owned(),
            stderr: String::new(),
        });
        let json = match serde_json::to_value(&outcome) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json["status"], "completed");
        assert_eq!(json["stdout"], "ok\n");
    }

    #[test]
    fn runner_errors_map_to_distinct_failure_kinds() {
        let cases = [
            (RunnerError::Transport("refused".to_owned()), FailureKind::Transport),
            (RunnerError::Timeout(Duration::from_secs(3)), FailureKind::Timeout),
            (RunnerError::Rejected { status: 401, body: String::new() }, FailureKind::Rejected),
            (RunnerError::Malformed("eof".to_owned()), FailureKind::Malformed),
        ];
        for (err, expected) in cases {
            match ExecutionOutcome::from(err) {
                ExecutionOutcome::Failed { kind, message } => {
                    assert_eq!(kind, expected);
                    assert!(message.starts_with("Execution failed:"), "got {message}");
                }
                other => panic!("expected Failed, got {other:?}"),
            }
        }
    }

    #[test]
    fn compile_error_output_is_still_completed() {
        let outcome = ExecutionOutcome::from(RunOutput {
            stdout: String::new(),
            stderr: "main.c:1: error: expected ';'".to_owned(),
        });
        assert!(outcome.is_completed(), "stderr from the program is a normal result");
    }
}
