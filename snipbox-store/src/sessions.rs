use async_trait::async_trait;
use chrono::{Duration, Utc};
use snipbox_core::session::{generate_token, token_digest};
use snipbox_core::{CoreError, IssuedSession, SessionStore, UserId};
use sqlx::PgPool;

use crate::connection::storage;

/// Postgres implementation of [`SessionStore`], keyed by token digest.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, CoreError> {
        let user_id: Option<String> = sqlx::query_scalar(
            "SELECT user_id FROM sessions WHERE token_digest = $1 AND expires_at > NOW()",
        )
        .bind(token_digest(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(user_id.map(UserId::new))
    }

    async fn create(&self, user_id: &UserId, ttl: Duration) -> Result<IssuedSession, CoreError> {
        let token = generate_token();
        let now = Utc::now();
        let expires_at = now + ttl;

        sqlx::query(
            "INSERT INTO sessions (token_digest, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(token_digest(token.expose_secret()))
        .bind(user_id.as_str())
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(IssuedSession { token, expires_at })
    }

    async fn destroy(&self, token: &str) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_digest = $1")
            .bind(token_digest(token))
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected())
    }
}
