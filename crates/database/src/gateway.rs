//! The persistence gateway: the only thing remote callers talk to.
//!
//! Every method is total. Store failures, unknown ids, unparsable ids and a
//! missing connection all collapse into `false`, an empty list or `None`, and
//! are logged here instead of being returned. Callers that need to tell those
//! cases apart should use [`Repository`] directly.

use crate::DbError;
use crate::connection::{connect, run_migrations};
use crate::repository::{DbRepository, Repository};
use configuration::DatabaseSettings;
use core_types::{Record, parse_id};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct Gateway {
    repo: Option<DbRepository>,
}

impl Gateway {
    /// Connects to the configured store and makes sure the tables exist.
    ///
    /// Never fails: if the connection string is missing or the store cannot be
    /// reached, the error is logged and a disconnected gateway is returned.
    pub async fn connect(settings: &DatabaseSettings) -> Self {
        info!("Connecting to the database");
        match Self::open(settings).await {
            Ok(repo) => {
                info!("Connected to the database");
                Self::new(repo)
            }
            Err(e) => {
                error!(error = %e, "Error connecting to the database; persistence calls will fail");
                Self::disconnected()
            }
        }
    }

    async fn open(settings: &DatabaseSettings) -> Result<DbRepository, DbError> {
        let pool = connect(settings).await?;
        run_migrations(&pool).await?;
        Ok(DbRepository::new(pool))
    }

    pub fn new(repo: DbRepository) -> Self {
        Self { repo: Some(repo) }
    }

    /// A gateway with no store behind it. Every call reports failure.
    pub fn disconnected() -> Self {
        Self { repo: None }
    }

    pub fn is_connected(&self) -> bool {
        self.repo.is_some()
    }

    /// Releases the connection pool.
    pub async fn close(&self) {
        if let Some(repo) = &self.repo {
            repo.close().await;
            info!("Database connection closed");
        }
    }

    fn repository(&self) -> Result<&DbRepository, DbError> {
        self.repo.as_ref().ok_or_else(|| {
            DbError::ConnectionConfigError("the gateway is not connected".to_string())
        })
    }

    /// Returns `true` if the record was stored.
    pub async fn create<E>(&self, fields: E::Fields) -> bool
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        match self.try_create::<E>(fields).await {
            Ok(record) => {
                debug!(kind = E::KIND, id = %record.id(), "Record created");
                true
            }
            Err(e) => {
                error!(kind = E::KIND, error = %e, "Failed to create record");
                false
            }
        }
    }

    /// Every record of the kind, newest first. Empty on failure.
    pub async fn get_all<E>(&self) -> Vec<E>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        match self.try_get_all::<E>().await {
            Ok(records) => records,
            Err(e) => {
                error!(kind = E::KIND, error = %e, "Failed to list records");
                Vec::new()
            }
        }
    }

    /// The record with this id, or `None` if there is none or the lookup failed.
    pub async fn search_by_id<E>(&self, id: &str) -> Option<E>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        match self.try_find::<E>(id).await {
            Ok(record) => Some(record),
            Err(DbError::NotFound) => {
                debug!(kind = E::KIND, id, "No record with this id");
                None
            }
            Err(e) => {
                log_failure(E::KIND, "search", id, &e);
                None
            }
        }
    }

    /// Overwrites every mutable field. `false` if nothing matched or on failure.
    pub async fn update<E>(&self, id: &str, fields: E::Fields) -> bool
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        match self.try_update::<E>(id, fields).await {
            Ok(()) => true,
            Err(e) => {
                log_failure(E::KIND, "update", id, &e);
                false
            }
        }
    }

    /// `false` if nothing matched or on failure.
    pub async fn delete<E>(&self, id: &str) -> bool
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        match self.try_delete::<E>(id).await {
            Ok(()) => true,
            Err(e) => {
                log_failure(E::KIND, "delete", id, &e);
                false
            }
        }
    }

    async fn try_create<E>(&self, fields: E::Fields) -> Result<E, DbError>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        let repo = self.repository()?;
        Repository::<E>::create(repo, fields).await
    }

    async fn try_get_all<E>(&self) -> Result<Vec<E>, DbError>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        let repo = self.repository()?;
        Repository::<E>::get_all(repo).await
    }

    async fn try_find<E>(&self, id: &str) -> Result<E, DbError>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        let repo = self.repository()?;
        let id = parse_id(id)?;
        Repository::<E>::find_by_id(repo, id).await
    }

    async fn try_update<E>(&self, id: &str, fields: E::Fields) -> Result<(), DbError>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        let repo = self.repository()?;
        let id = parse_id(id)?;
        Repository::<E>::update(repo, id, fields).await
    }

    async fn try_delete<E>(&self, id: &str) -> Result<(), DbError>
    where
        E: Record,
        DbRepository: Repository<E>,
    {
        let repo = self.repository()?;
        let id = parse_id(id)?;
        Repository::<E>::delete(repo, id).await
    }
}

/// Misses and bad ids are the caller's business; anything else is a store problem.
fn log_failure(kind: &str, operation: &str, id: &str, e: &DbError) {
    match e {
        DbError::NotFound | DbError::InvalidId(_) => {
            warn!(kind, operation, id, error = %e, "No record affected");
        }
        _ => error!(kind, operation, id, error = %e, "Store call failed"),
    }
}
