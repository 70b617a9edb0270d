use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Establishes a connection pool to the configured database.
///
/// The connection string comes from the settings (normally `DATABASE_URL`)
/// and must be a `sqlite:` URL. The database file is created if it does not
/// exist yet. The pool can be shared across the entire application.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    let database_url = settings
        .url
        .as_deref()
        .ok_or_else(|| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    // Anything else would be taken as a file name. Only the scheme is echoed
    // back, the rest may carry credentials.
    if !database_url.starts_with("sqlite:") {
        let scheme = database_url.split(':').next().unwrap_or_default();
        return Err(DbError::ConnectionConfigError(format!(
            "DATABASE_URL must be a sqlite: URL, got scheme {scheme:?}."
        )));
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Opens a private in-memory database.
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// pinned to exactly one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the four record tables if they are absent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
