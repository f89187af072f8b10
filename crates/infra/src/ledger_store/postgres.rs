//! Postgres-backed ledger store.
//!
//! Table and column names come from [`LedgerConfig`] (validated identifiers), so
//! the store can sit on an existing `inventories` table with a custom owner key
//! column.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | LedgerStoreError |
//! |------------|----------------------|------------------|
//! | Database (integrity) | `23xxx` | `Constraint` |
//! | Database (other) | any other | `Unavailable` |
//! | Decode / ColumnDecode / ColumnNotFound | N/A | `Decode` |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Unavailable` |
//!
//! ## Runtime
//!
//! [`LedgerStore`] is synchronous. The store keeps a handle to the tokio runtime
//! that owns the pool and blocks on it; call it either outside any runtime or
//! from a multi-thread runtime worker (it uses `block_in_place`). Calls from a
//! current-thread runtime return `LedgerStoreError::Runtime`.

use std::future::Future;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::instrument;

use stockledger_core::{EntryId, OwnerRef};
use stockledger_inventory::{LedgerEntry, NewLedgerEntry, QuantityFilter};

use super::r#trait::{LedgerStore, LedgerStoreError};
use crate::config::{ConfigError, LedgerConfig};

/// SQL rendered once from the configured table layout.
#[derive(Debug, Clone)]
struct Statements {
    schema: String,
    insert: String,
    delete_all: String,
    find_current: String,
    history: String,
    table: String,
    owner_type_column: String,
    owner_key_column: String,
}

impl Statements {
    fn render(config: &LedgerConfig) -> Self {
        let t = &config.table_name;
        let ty = &config.owner_type_column;
        let key = &config.owner_key_column;

        Self {
            schema: format!(
                r#"
                CREATE TABLE IF NOT EXISTS {t} (
                    id BIGSERIAL PRIMARY KEY,
                    quantity BIGINT NOT NULL DEFAULT 0 CHECK (quantity >= 0),
                    description TEXT NULL,
                    {ty} TEXT NOT NULL,
                    {key} TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                CREATE INDEX IF NOT EXISTS {t}_owner_idx ON {t} ({ty}, {key}, id DESC);
                "#
            ),
            insert: format!(
                "INSERT INTO {t} ({ty}, {key}, quantity, description) \
                 VALUES ($1, $2, $3, $4) RETURNING id, created_at"
            ),
            delete_all: format!("DELETE FROM {t} WHERE {ty} = $1 AND {key} = $2"),
            find_current: format!(
                "SELECT id, quantity, description, created_at FROM {t} \
                 WHERE {ty} = $1 AND {key} = $2 ORDER BY id DESC LIMIT 1"
            ),
            history: format!(
                "SELECT id, quantity, description, created_at FROM {t} \
                 WHERE {ty} = $1 AND {key} = $2 ORDER BY id DESC"
            ),
            table: t.clone(),
            owner_type_column: ty.clone(),
            owner_key_column: key.clone(),
        }
    }

    /// Latest-per-owner filter: only each owner's `MAX(id)` row is compared.
    fn owners_where(&self, filter: &QuantityFilter) -> String {
        let t = &self.table;
        let ty = &self.owner_type_column;
        let key = &self.owner_key_column;
        let op = filter.comparison.as_sql();

        format!(
            "SELECT e.{key} AS owner_id FROM {t} e \
             WHERE e.{ty} = $1 \
               AND e.id IN (SELECT MAX(id) FROM {t} WHERE {ty} = $1 GROUP BY {key}) \
               AND e.quantity {op} $2 \
               AND ($3::text[] IS NULL OR e.{key} = ANY($3)) \
             ORDER BY e.{key}"
        )
    }
}

/// Postgres-backed append-only ledger store.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
    runtime: Handle,
    sql: Statements,
}

impl PostgresLedgerStore {
    /// Wrap an existing pool. `runtime` must be the runtime driving the pool.
    pub fn new(pool: PgPool, config: &LedgerConfig, runtime: Handle) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pool,
            runtime,
            sql: Statements::render(config),
        })
    }

    /// Connect using `config.database_url` on the current runtime.
    pub async fn connect(config: &LedgerConfig) -> anyhow::Result<Self> {
        let url = config
            .database_url
            .as_deref()
            .context("database_url is not configured (set STOCKLEDGER_DATABASE_URL or DATABASE_URL)")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .with_context(|| format!("failed to connect to ledger database ({})", config.table_name))?;

        Ok(Self::new(pool, config, Handle::current())?)
    }

    /// DDL for the configured table.
    pub fn schema_sql(&self) -> &str {
        &self.sql.schema
    }

    /// Create the table and owner index if missing.
    pub fn migrate(&self) -> Result<(), LedgerStoreError> {
        self.block_on(async {
            sqlx::raw_sql(&self.sql.schema)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| map_sqlx_error("migrate", e))
        })
    }

    /// Drive `fut` to completion on the pool's runtime.
    ///
    /// A current-thread runtime cannot give up its only worker, so calls made
    /// from one fail with [`LedgerStoreError::Runtime`] instead of blocking.
    fn block_on<T, F>(&self, fut: F) -> Result<T, LedgerStoreError>
    where
        F: Future<Output = Result<T, LedgerStoreError>>,
    {
        match Handle::try_current() {
            Ok(current) if current.runtime_flavor() == RuntimeFlavor::CurrentThread => {
                Err(LedgerStoreError::Runtime(
                    "blocking ledger calls need a multi-thread runtime or no runtime at all".to_string(),
                ))
            }
            Ok(_) => tokio::task::block_in_place(|| self.runtime.block_on(fut)),
            Err(_) => self.runtime.block_on(fut),
        }
    }

    #[instrument(skip(self, entry), fields(owner = %entry.owner(), quantity = entry.quantity()), err)]
    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerStoreError> {
        let owner = entry.owner();
        let row = sqlx::query(&self.sql.insert)
            .bind(owner.owner_type())
            .bind(owner.owner_id())
            .bind(entry.quantity())
            .bind(entry.description())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        let id = decode_id(&row)?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(entry.into_entry(id, created_at))
    }

    #[instrument(skip(self), fields(owner = %owner), err)]
    async fn delete_owner(&self, owner: &OwnerRef) -> Result<u64, LedgerStoreError> {
        let result = sqlx::query(&self.sql.delete_all)
            .bind(owner.owner_type())
            .bind(owner.owner_id())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all", e))?;
        Ok(result.rows_affected())
    }

    async fn fetch_entries(&self, sql: &str, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        let rows = sqlx::query(sql)
            .bind(owner.owner_type())
            .bind(owner.owner_id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_entries", e))?;

        rows.iter().map(|row| decode_entry(row, owner)).collect()
    }

    #[instrument(skip(self, owner_ids), fields(filter = %format!("{} {}", filter.comparison, filter.quantity)), err)]
    async fn owners_where(
        &self,
        owner_type: &str,
        filter: QuantityFilter,
        owner_ids: Option<Vec<String>>,
    ) -> Result<Vec<String>, LedgerStoreError> {
        let sql = self.sql.owners_where(&filter);
        let rows = sqlx::query(&sql)
            .bind(owner_type)
            .bind(filter.quantity)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_owners_where_current_quantity", e))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("owner_id").map_err(|e| map_sqlx_error("owner_id", e)))
            .collect()
    }
}

impl LedgerStore for PostgresLedgerStore {
    fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerStoreError> {
        self.block_on(self.insert_entry(entry))
    }

    fn delete_all(&self, owner: &OwnerRef) -> Result<u64, LedgerStoreError> {
        self.block_on(self.delete_owner(owner))
    }

    fn find_current(&self, owner: &OwnerRef) -> Result<Option<LedgerEntry>, LedgerStoreError> {
        let entries = self.block_on(self.fetch_entries(&self.sql.find_current, owner))?;
        Ok(entries.into_iter().next())
    }

    fn find_owners_where_current_quantity(
        &self,
        owner_type: &str,
        filter: QuantityFilter,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<String>, LedgerStoreError> {
        self.block_on(self.owners_where(owner_type, filter, owner_ids.map(<[String]>::to_vec)))
    }

    fn history(&self, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        self.block_on(self.fetch_entries(&self.sql.history, owner))
    }
}

fn decode_id(row: &PgRow) -> Result<EntryId, LedgerStoreError> {
    let raw: i64 = row.try_get("id").map_err(|e| map_sqlx_error("id", e))?;
    u64::try_from(raw)
        .map(EntryId::new)
        .map_err(|_| LedgerStoreError::Decode(format!("negative entry id {raw}")))
}

fn decode_entry(row: &PgRow, owner: &OwnerRef) -> Result<LedgerEntry, LedgerStoreError> {
    let quantity: i64 = row.try_get("quantity").map_err(|e| map_sqlx_error("quantity", e))?;
    let description: Option<String> = row
        .try_get("description")
        .map_err(|e| map_sqlx_error("description", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| map_sqlx_error("created_at", e))?;

    let entry = NewLedgerEntry::new(owner.clone(), quantity, description)
        .map_err(|e| LedgerStoreError::Decode(e.to_string()))?;
    Ok(entry.into_entry(decode_id(row)?, created_at))
}

/// Map sqlx errors to `LedgerStoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                // Class 23: integrity constraint violation.
                Some(code) if code.starts_with("23") => LedgerStoreError::Constraint(msg),
                _ => LedgerStoreError::Unavailable(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => {
            LedgerStoreError::Decode(format!("{} in {}", err, operation))
        }
        sqlx::Error::PoolClosed => {
            LedgerStoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        _ => LedgerStoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
