//! # PostgreSQL User Store
//!
//! Pooled SQLx adapter for the `users` table. Column names are not derived
//! from the Rust struct; the adapter reads them from an explicit
//! [`TableMapping`] so the table layout and the entity type can evolve
//! independently.
//!
//! ## Error Mapping
//!
//! | SQLx error                       | SQLSTATE | StoreError    |
//! |----------------------------------|----------|---------------|
//! | Database (unique violation)      | `23505`  | `Duplicate`   |
//! | Any other database error         | —        | `Unavailable` |
//! | Pool timeout / closed, I/O, TLS  | —        | `Unavailable` |

use std::time::Duration;

use async_trait::async_trait;
use roster_core::{NewUser, User, UserId};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::error::StoreError;
use crate::store::UserStore;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Explicit mapping from [`User`] fields to table and column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMapping {
    /// Table name.
    pub table: &'static str,
    /// Column backing [`User::id`].
    pub id: &'static str,
    /// Column backing [`User::email`]; carries the unique constraint.
    pub email: &'static str,
    /// Column backing [`User::created_at`].
    pub created_at: &'static str,
    /// Column backing [`User::updated_at`].
    pub updated_at: &'static str,
}

/// Mapping for the `users` table created by the embedded migrations.
pub const USERS: TableMapping = TableMapping {
    table: "users",
    id: "id",
    email: "email",
    created_at: "created_at",
    updated_at: "updated_at",
};

impl TableMapping {
    fn columns(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.id, self.email, self.created_at, self.updated_at
        )
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ($1) RETURNING {}",
            self.table,
            self.email,
            self.columns()
        )
    }

    fn select_all_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {} ASC",
            self.columns(),
            self.table,
            self.id
        )
    }

    fn read_user(&self, row: &PgRow) -> Result<User, sqlx::Error> {
        Ok(User {
            id: UserId(row.try_get(self.id)?),
            email: row.try_get(self.email)?,
            created_at: row.try_get(self.created_at)?,
            updated_at: row.try_get(self.updated_at)?,
        })
    }
}

/// Connection settings for [`PgUserStore::connect`].
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a free pooled connection.
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    /// Config with the default pool size (10) and acquire timeout (5 s).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// [`UserStore`] backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
    mapping: TableMapping,
    insert_sql: String,
    select_all_sql: String,
}

impl PgUserStore {
    /// Connect a pool and apply the embedded migrations.
    pub async fn connect(config: &PgStoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::unavailable("connect", e.to_string()))?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        tracing::info!("Database migrations applied");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool using the default [`USERS`] mapping.
    /// Migrations are not run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self::with_mapping(pool, USERS)
    }

    /// Wrap an existing pool using a custom table mapping.
    pub fn with_mapping(pool: PgPool, mapping: TableMapping) -> Self {
        Self {
            insert_sql: mapping.insert_sql(),
            select_all_sql: mapping.select_all_sql(),
            pool,
            mapping,
        }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The table mapping this store reads and writes through.
    pub fn mapping(&self) -> &TableMapping {
        &self.mapping
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn save(&self, new: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(&self.insert_sql)
            .bind(&new.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate {
                        email: new.email.clone(),
                    }
                } else {
                    map_sqlx_error("save", e)
                }
            })?;

        self.mapping
            .read_user(&row)
            .map_err(|e| map_sqlx_error("save", e))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&self.select_all_sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter()
            .map(|row| self.mapping.read_user(row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("find_all", e))
    }
}

/// Map non-uniqueness SQLx errors to [`StoreError::Unavailable`].
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::unavailable(
            operation,
            format!(
                "database error (code {}): {}",
                db_err.code().as_deref().unwrap_or("none"),
                db_err.message()
            ),
        ),
        sqlx::Error::PoolTimedOut => {
            StoreError::unavailable(operation, "timed out acquiring a pooled connection")
        }
        sqlx::Error::PoolClosed => StoreError::unavailable(operation, "connection pool closed"),
        other => StoreError::unavailable(operation, other.to_string()),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == UNIQUE_VIOLATION;
        }
    }
    false
}
