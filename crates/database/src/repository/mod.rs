//! Strict, per-record data access.
//!
//! Every method is a single SQL statement and reports exactly what happened,
//! including `DbError::NotFound` when no row matched. The lenient behaviour the
//! remote callers see lives in [`crate::gateway`].

use crate::DbError;
use async_trait::async_trait;
use core_types::Record;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteQueryResult;
use uuid::Uuid;

mod enrollments;
mod professors;
mod students;
mod subjects;

/// The capability set every record type gets.
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    /// Inserts a new row with a fresh id and the current timestamp.
    async fn create(&self, fields: E::Fields) -> Result<E, DbError>;

    /// Every row, newest first.
    async fn get_all(&self) -> Result<Vec<E>, DbError>;

    async fn find_by_id(&self, id: Uuid) -> Result<E, DbError>;

    /// Overwrites all mutable fields. `id` and `createdAt` are never touched.
    async fn update(&self, id: Uuid, fields: E::Fields) -> Result<(), DbError>;

    /// Hard delete.
    async fn delete(&self, id: Uuid) -> Result<(), DbError>;
}

/// The `DbRepository` holds the connection pool and implements
/// [`Repository`] for each of the four record types.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Turns "zero rows affected" into `NotFound`.
fn expect_row(result: SqliteQueryResult) -> Result<(), DbError> {
    if result.rows_affected() == 0 {
        Err(DbError::NotFound)
    } else {
        Ok(())
    }
}
