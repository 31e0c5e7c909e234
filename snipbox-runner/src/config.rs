//! Runner connection settings.

use std::time::Duration;

use snipbox_core::SecretString;

/// Default per-attempt timeout for a runner call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of extra attempts after a transport failure.
pub const DEFAULT_RETRIES: u8 = 1;

/// How to reach the external code runner.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RunnerConfig {
    /// Full URL the submission is POSTed to.
    pub endpoint: String,

    /// Credential sent as `Authorization: Token <key>`.
    pub api_key: SecretString,

    /// Upper bound on a single attempt, connect time included.
    pub timeout: Duration,

    /// Extra attempts made after a transport failure or timeout.
    pub retries: u8,
}

impl RunnerConfig {
    /// Create a config with the default timeout and retry budget.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }
}
