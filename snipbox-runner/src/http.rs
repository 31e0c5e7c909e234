//! HTTP backend for the external code runner.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use snipbox_core::SecretString;

use crate::backend::RunnerBackend;
use crate::submission::parse_run_output;
use crate::{RunOutput, RunnerConfig, RunnerError, Submission};

/// Longest slice of a rejected response body kept in the error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Runner backend that POSTs JSON submissions over HTTP(S).
///
/// The per-attempt timeout covers connect, send and reading the body.
#[derive(Debug, Clone)]
pub struct HttpRunner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    timeout: Duration,
}

impl HttpRunner {
    /// Build a runner client from `config`.
    ///
    /// # Errors
    /// Returns [`RunnerError::Config`] if the TLS backend cannot be initialised.
    pub fn new(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| RunnerError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    fn classify(&self, err: &reqwest::Error) -> RunnerError {
        if err.is_timeout() {
            RunnerError::Timeout(self.timeout)
        } else {
            RunnerError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RunnerBackend for HttpRunner {
    async fn run(&self, submission: &Submission) -> Result<RunOutput, RunnerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Token {}", self.api_key.expose_secret()))
            .json(submission)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(&e))?;

        if !status.is_success() {
            let body: String = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(RunnerError::Rejected { status: status.as_u16(), body });
        }

        parse_run_output(&body)
    }
}
