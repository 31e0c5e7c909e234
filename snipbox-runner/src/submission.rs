//! Wire types for the external runner.

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;
use crate::language::Language;

/// One file in a runner submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// Request body sent to the runner: `{language, stdin, files: [{name, content}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Submission {
    pub language: Language,
    pub stdin: String,
    pub files: Vec<SourceFile>,
}

impl Submission {
    /// Packages `source` as the single file the runner expects for `language`.
    #[must_use]
    pub fn single_file(language: Language, source: impl Into<String>, stdin: impl Into<String>) -> Self {
        Self {
            language,
            stdin: stdin.into(),
            files: vec![SourceFile {
                name: language.file_name().to_owned(),
                content: source.into(),
            }],
        }
    }
}

/// Captured output reported by the runner. Extra response fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Parses a runner response body.
///
/// # Errors
/// Returns [`RunnerError::Malformed`] if the body is not JSON with string
/// `stdout` and `stderr` fields.
pub fn parse_run_output(body: &[u8]) -> Result<RunOutput, RunnerError> {
    serde_json::from_slice(body).map_err(|e| RunnerError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_python_submission_uses_py_name() {
        let submission = Submission::single_file(Language::Python, "print(input())", "hi\n");
        assert_eq!(submission.files.len(), 1);
        assert_eq!(submission.files[0].name, "main.py");
        assert_eq!(submission.files[0].content, "print(input())");
        assert_eq!(submission.stdin, "hi\n");
    }

    #[test]
    fn submission_serializes_to_runner_contract() {
        let submission = Submission::single_file(Language::Cpp, "int main(){}", "");
        let json = match serde_json::to_value(&submission) {
            Ok(v) => v,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(
            json,
            serde_json::json!({
                "language": "cpp",
                "stdin": "",
                "files": [{"name": "main.cpp", "content": "int main(){}"}],
            })
        );
    }

    #[test]
    fn parse_run_output_ignores_extra_fields() {
        let body = br#"{"stdout":"4\n","stderr":"","error":"","exitCode":0}"#;
        let output = match parse_run_output(body) {
            Ok(o) => o,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(output.stdout, "4\n");
        assert_eq!(output.stderr, "");
    }

    #[test]
    fn parse_run_output_rejects_missing_fields() {
        assert!(matches!(
            parse_run_output(br#"{"stdout":"x"}"#),
            Err(RunnerError::Malformed(_))
        ));
        assert!(matches!(parse_run_output(b"<html>"), Err(RunnerError::Malformed(_))));
    }

    proptest::proptest! {
        #[test]
        fn proptest_parse_run_output_never_panics(
            body in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..256usize),
        ) {
            let _ = parse_run_output(&body);
        }
    }
}
