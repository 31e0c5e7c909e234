//! Pool construction and migrations.

use std::time::Duration;

use snipbox_core::CoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// How long a request waits for a pooled connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection pool of at most `max_connections`.
///
/// The pool size is independent of request concurrency; excess requests wait
/// up to five seconds for a connection.
///
/// # Errors
/// Returns [`CoreError::Storage`] if the initial connection fails.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, CoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(storage)?;
    tracing::info!(max_connections, "connected to postgres");
    Ok(pool)
}

/// Applies the embedded schema migrations.
///
/// # Errors
/// Returns [`CoreError::Storage`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), CoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CoreError::Storage(format!("migration failed: {e}")))
}

pub(crate) fn storage(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}
