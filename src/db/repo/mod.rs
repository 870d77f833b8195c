//! Repository layer for database operations.
//!
//! Read paths go through `Repository` methods on the pool. Write paths that
//! must be atomic (admission: conflict check + insert + debit) run against a
//! single connection inside a `BEGIN IMMEDIATE` transaction, using the free
//! functions in the entity submodules.

pub mod boosts;
pub mod pricing;
pub mod wallet;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePool;
use sqlx::Sqlite;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a write transaction that takes the database write lock up front.
    ///
    /// IMMEDIATE (rather than deferred) means two racing admission units
    /// serialize before their conflict scans run, so the loser observes the
    /// winner's committed rows. `busy_timeout` bounds the wait.
    ///
    /// The caller must finish with [`Repository::commit`] or
    /// [`Repository::rollback`]; the connection must not be returned to the
    /// pool with the transaction still open.
    pub async fn begin_immediate(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(conn)
    }

    /// Commit a transaction opened with [`Repository::begin_immediate`].
    pub async fn commit(mut conn: PoolConnection<Sqlite>) -> Result<(), sqlx::Error> {
        sqlx::query("COMMIT").execute(&mut *conn).await?;
        Ok(())
    }

    /// Roll back a transaction opened with [`Repository::begin_immediate`].
    ///
    /// If the rollback itself fails the connection is detached from the pool
    /// so a half-open transaction can never be handed to another caller.
    pub async fn rollback(mut conn: PoolConnection<Sqlite>) {
        if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
            tracing::error!(error = %e, "rollback failed, discarding connection");
            drop(conn.detach());
        }
    }
}
