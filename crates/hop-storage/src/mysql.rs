use async_trait::async_trait;
use hop_core::{Alias, DurableStore, RecordId, UserId};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace};

use crate::error::{Result, StorageError};

/// MySQL implementation of the durable store contract.
///
/// Mutations run inside explicit transactions. A transaction that is dropped
/// before `commit` is rolled back by sqlx, so every early return leaves the
/// table untouched. Uniqueness is enforced by the `uk_url_alias` index, not
/// by a read-before-write.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl DurableStore for MySqlStore {
    async fn save_url(&self, alias: &Alias, url: &str, creator: UserId) -> Result<RecordId> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO url (alias, url, creator)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(alias.as_str())
        .bind(url)
        .bind(creator)
        .execute(&mut *tx)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_id(),
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::AliasExists(alias.to_string()))
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        tx.commit().await.map_err(map_sqlx_error)?;

        let id = RecordId::try_from(id)
            .map_err(|_| StorageError::InvalidData(format!("record id {id} overflows i64")))?;
        debug!(alias = %alias, id, "Inserted url record");
        Ok(id)
    }

    async fn get_url(&self, alias: &Alias) -> Result<String> {
        trace!(alias = %alias, "Fetching url from MySQL");

        let row = sqlx::query(
            r#"
            SELECT url
            FROM url
            WHERE alias = ?
            LIMIT 1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::AliasNotFound(alias.to_string()));
        };

        row.try_get("url").map_err(map_sqlx_error)
    }

    async fn creator(&self, alias: &Alias) -> Result<UserId> {
        let row = sqlx::query(
            r#"
            SELECT creator
            FROM url
            WHERE alias = ?
            LIMIT 1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::AliasNotFound(alias.to_string()));
        };

        row.try_get("creator").map_err(map_sqlx_error)
    }

    async fn delete_url(&self, alias: &Alias) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            DELETE FROM url
            WHERE alias = ?
            "#,
        )
        .bind(alias.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        let removed = result.rows_affected() > 0;
        debug!(alias = %alias, removed, "Deleted url record");
        Ok(removed)
    }
}
