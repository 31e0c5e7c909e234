use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::poisoned;
use crate::error::CoreError;
use crate::id::UserId;
use crate::session::{generate_token, token_digest, IssuedSession, Session, SessionStore};

/// Session store keyed by token digest.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, CoreError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .map_err(poisoned)?
            .get(&token_digest(token))
            .filter(|s| !s.is_expired_at(now))
            .map(|s| s.user_id.clone()))
    }

    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<IssuedSession, CoreError> {
        let token = generate_token();
        let now = Utc::now();
        let session = Session {
            user_id: user_id.clone(),
            created_at: now,
            expires_at: now + ttl,
        };
        let expires_at = session.expires_at;
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(token_digest(token.expose_secret()), session);
        Ok(IssuedSession { token, expires_at })
    }

    async fn destroy(&self, token: &str) -> Result<(), CoreError> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .remove(&token_digest(token));
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, CoreError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        let pruned = before.saturating_sub(sessions.len());
        Ok(u64::try_from(pruned).unwrap_or(u64::MAX))
    }
}
