use async_trait::async_trait;
use snipbox_core::user::normalize_email;
use snipbox_core::{CoreError, UserAccount, UserDirectory, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::connection::storage;

/// Postgres implementation of [`UserDirectory`].
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: String,
    email: String,
    password_hash: String,
}

impl From<UserRecord> for UserAccount {
    fn from(row: UserRecord) -> Self {
        UserAccount {
            id: UserId::new(row.id),
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError> {
        let row: Option<UserRecord> =
            sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = $1")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;

        Ok(row.map(Into::into))
    }

    async fn ensure(&self, email: &str, password_hash: &str) -> Result<UserAccount, CoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: UserRecord = sqlx::query_as(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email \
             RETURNING id, email, password_hash",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(normalize_email(email))
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.into())
    }
}
