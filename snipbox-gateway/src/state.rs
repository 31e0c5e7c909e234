//! Shared application state and its construction from configuration.

use std::{sync::Arc, time::Duration};

use snipbox_core::{
    password::hash_password, InMemoryProjectRepository, InMemorySessionStore,
    InMemoryUserDirectory, ProjectRepository, SessionStore, UserDirectory,
};
use snipbox_runner::{ExecutionProxy, HttpRunner};
use snipbox_store::{PgProjectRepository, PgSessionStore, PgUserDirectory};
use tracing::{info, warn};

use crate::{
    config::{BootstrapUser, GatewayConfig},
    error::StartupError,
    session_cookie::CookieSettings,
};

/// How often expired sessions are swept from the store.
pub const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Handles shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserDirectory>,
    pub proxy: ExecutionProxy,
    pub cookies: CookieSettings,
}

impl AppState {
    /// State over volatile in-memory stores.
    #[must_use]
    pub fn in_memory(proxy: ExecutionProxy, cookies: CookieSettings) -> Self {
        Self {
            projects: Arc::new(InMemoryProjectRepository::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            users: Arc::new(InMemoryUserDirectory::new()),
            proxy,
            cookies,
        }
    }

    /// Builds the state described by `config`: Postgres stores when a
    /// database is configured (migrations are applied first), in-memory
    /// stores otherwise. Creates the bootstrap user if one is configured.
    ///
    /// # Errors
    /// Returns [`StartupError`] if the database is unreachable, a migration
    /// fails, the runner client cannot be built, or the bootstrap user
    /// cannot be stored.
    pub async fn from_config(config: &GatewayConfig) -> Result<Self, StartupError> {
        let runner = HttpRunner::new(&config.runner)?;
        let proxy = ExecutionProxy::new(Arc::new(runner), config.runner.timeout, config.runner.retries);
        let cookies = CookieSettings::new(
            config.session_secret.clone(),
            config.environment.secure_cookies(),
        );

        let state = match &config.database {
            Some(db) => {
                let pool = snipbox_store::connect(db.url.expose_secret(), db.max_connections).await?;
                snipbox_store::migrate(&pool).await?;
                info!(max_connections = db.max_connections, "using postgres stores");
                Self {
                    projects: Arc::new(PgProjectRepository::new(pool.clone())),
                    sessions: Arc::new(PgSessionStore::new(pool.clone())),
                    users: Arc::new(PgUserDirectory::new(pool)),
                    proxy,
                    cookies,
                }
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory stores, data is lost on restart");
                Self::in_memory(proxy, cookies)
            }
        };

        if let Some(user) = &config.bootstrap_user {
            state.bootstrap(user).await?;
        }
        Ok(state)
    }

    async fn bootstrap(&self, user: &BootstrapUser) -> Result<(), StartupError> {
        let hash = hash_password(&user.password)?;
        let account = self.users.ensure(&user.email, &hash).await?;
        info!(user_id = %account.id, email = %account.email, "bootstrap user ready");
        Ok(())
    }

    /// Spawns a task that deletes expired sessions every `interval`.
    pub fn spawn_session_pruner(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match sessions.prune_expired().await {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "pruned expired sessions"),
                    Err(e) => warn!(error = %e, "session prune failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use snipbox_core::{SecretString, UserId};
    use snipbox_runner::RunnerConfig;

    use super::*;

    fn proxy() -> ExecutionProxy {
        let config = RunnerConfig::new("http://127.0.0.1:9/run", SecretString::new("k"));
        match HttpRunner::new(&config) {
            Ok(runner) => ExecutionProxy::new(Arc::new(runner), config.timeout, 0),
            Err(e) => panic!("runner client: {e}"),
        }
    }

    fn state() -> AppState {
        AppState::in_memory(proxy(), CookieSettings::new(SecretString::new("s".repeat(32)), false))
    }

    #[tokio::test]
    async fn bootstrap_user_can_be_found_and_is_idempotent() {
        let state = state();
        let user = BootstrapUser {
            email: "Ada@Example.com".to_owned(),
            password: SecretString::new("hunter22"),
        };
        if let Err(e) = state.bootstrap(&user).await {
            panic!("bootstrap failed: {e}");
        }
        if let Err(e) = state.bootstrap(&user).await {
            panic!("second bootstrap failed: {e}");
        }
        let found = match state.users.find_by_email("ada@example.com").await {
            Ok(found) => found,
            Err(e) => panic!("lookup failed: {e}"),
        };
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn pruner_removes_expired_sessions() {
        let state = state();
        let user = UserId::new("u1");
        let expired = match state.sessions.create(&user, ChronoDuration::seconds(-1)).await {
            Ok(s) => s,
            Err(e) => panic!("create failed: {e}"),
        };
        let handle = state.spawn_session_pruner(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let again = match state.sessions.prune_expired().await {
            Ok(n) => n,
            Err(e) => panic!("prune failed: {e}"),
        };
        assert_eq!(again, 0, "pruner should already have removed the expired session");
        let resolved = match state.sessions.resolve(expired.token.expose_secret()).await {
            Ok(r) => r,
            Err(e) => panic!("resolve failed: {e}"),
        };
        assert_eq!(resolved, None);
    }
}
