//! Gateway configuration, read once from the environment at startup.

use std::time::Duration;

use snipbox_core::SecretString;
use snipbox_runner::RunnerConfig;

/// Shortest accepted cookie signing secret, in bytes.
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Deployment environment. Controls the cookie `Secure` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn secure_cookies(self) -> bool {
        self == Environment::Production
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string; may embed a password.
    pub url: SecretString,
    pub max_connections: u32,
}

/// Account created at startup if it does not exist yet.
#[derive(Debug, Clone)]
pub struct BootstrapUser {
    pub email: String,
    pub password: SecretString,
}

/// Everything the gateway needs to start.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    pub listen_addr: String,
    pub environment: Environment,
    pub session_secret: SecretString,
    /// `None` selects the in-memory stores.
    pub database: Option<DatabaseConfig>,
    pub runner: RunnerConfig,
    pub bootstrap_user: Option<BootstrapUser>,
}

impl GatewayConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a required variable is missing or any value
    /// is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let listen_addr = get("SNIPBOX_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());

        let environment = match get("SNIPBOX_ENV").as_deref().map(str::trim) {
            None | Some("development" | "dev" | "local") => Environment::Development,
            Some("production" | "prod") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SNIPBOX_ENV",
                    reason: format!("expected 'development' or 'production', got '{other}'"),
                })
            }
        };

        let session_secret = SecretString::new(require("SNIPBOX_SESSION_SECRET")?);
        if session_secret.len() < MIN_SESSION_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                var: "SNIPBOX_SESSION_SECRET",
                reason: format!("must be at least {MIN_SESSION_SECRET_BYTES} bytes"),
            });
        }

        let database = match get("DATABASE_URL") {
            None => None,
            Some(url) => Some(DatabaseConfig {
                url: SecretString::new(url),
                max_connections: parse_or(
                    get("DATABASE_MAX_CONNECTIONS"),
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
        };

        let mut runner = RunnerConfig::new(
            require("SNIPBOX_RUNNER_URL")?,
            SecretString::new(require("SNIPBOX_RUNNER_API_KEY")?),
        );
        let timeout_secs: u64 = parse_or(
            get("SNIPBOX_RUNNER_TIMEOUT_SECS"),
            "SNIPBOX_RUNNER_TIMEOUT_SECS",
            runner.timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SNIPBOX_RUNNER_TIMEOUT_SECS",
                reason: "must be greater than zero".to_owned(),
            });
        }
        runner = runner.with_timeout(Duration::from_secs(timeout_secs));
        let retries = parse_or(
            get("SNIPBOX_RUNNER_RETRIES"),
            "SNIPBOX_RUNNER_RETRIES",
            runner.retries,
        )?;
        runner = runner.with_retries(retries);

        let bootstrap_user = match get("SNIPBOX_BOOTSTRAP_USER") {
            None => None,
            Some(raw) => match raw.split_once(':') {
                Some((email, password)) if !email.trim().is_empty() && !password.is_empty() => {
                    Some(BootstrapUser {
                        email: email.trim().to_owned(),
                        password: SecretString::new(password),
                    })
                }
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "SNIPBOX_BOOTSTRAP_USER",
                        reason: "expected 'email:password'".to_owned(),
                    })
                }
            },
        };

        Ok(Self {
            listen_addr,
            environment,
            session_secret,
            database,
            runner,
            bootstrap_user,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
