//! SQLite-backed poem store.
//!
//! Schema, created by [`SqlitePoemStore::migrate`]:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS <table> (
//!     id TEXT PRIMARY KEY,
//!     accession_number TEXT,
//!     poem TEXT,
//!     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
//! );
//! CREATE INDEX IF NOT EXISTS <table>_accession_number_idx ON <table> (accession_number);
//! ```

use super::PoemStore;
use crate::types::{LookupKey, Poem};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, warn};

pub struct SqlitePoemStore {
    pool: SqlitePool,
    table: String,
}

fn unavailable(e: sqlx::Error) -> Error {
    Error::store_unavailable(format!("error talking to the database: {}", e))
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::configuration_with_context(
            "table name must be a plain SQL identifier",
            ErrorContext::new()
                .with_field_path("POEMS_TABLE_NAME")
                .with_details(table.to_string())
                .with_source("sqlite_store"),
        ))
    }
}

impl SqlitePoemStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str, table: &str, max_connections: u32) -> Result<Self> {
        validate_table_name(table)?;
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid database url: {}", e),
                    ErrorContext::new()
                        .with_field_path("POEMS_DATABASE_URL")
                        .with_source("sqlite_store"),
                )
            })?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let store = Self::from_pool(pool, table)?;
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool. Call [`migrate`](Self::migrate) before use if
    /// the table may not exist yet.
    pub fn from_pool(pool: SqlitePool, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                accession_number TEXT,
                poem TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            table = self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {table}_accession_number_idx ON {table} (accession_number)",
            table = self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        debug!(table = %self.table, "poem table ready");
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn decode_row(row: &SqliteRow) -> Result<Option<Poem>> {
        let corrupt = |column: &str, e: sqlx::Error| {
            Error::store_corrupt(format!("column {} does not decode: {}", column, e), None)
        };

        let id: Option<String> = row.try_get("id").map_err(|e| corrupt("id", e))?;
        let id = match id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };
        let accession_number: Option<String> = row
            .try_get("accession_number")
            .map_err(|e| corrupt("accession_number", e))?;
        let text: Option<String> = row.try_get("poem").map_err(|e| corrupt("poem", e))?;

        match (accession_number, text) {
            (Some(accession_number), Some(text)) => Ok(Some(Poem {
                id,
                accession_number,
                text,
            })),
            _ => Err(Error::store_corrupt(
                "record is missing accession_number or poem",
                Some(id),
            )),
        }
    }
}

#[async_trait]
impl PoemStore for SqlitePoemStore {
    async fn lookup(&self, key: &LookupKey) -> Result<Option<Poem>> {
        match key {
            LookupKey::PrimaryId(id) => {
                let row = sqlx::query(&format!(
                    "SELECT id, accession_number, poem FROM {} WHERE id = ?1",
                    self.table
                ))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)?;
                match row {
                    Some(row) => Self::decode_row(&row),
                    None => Ok(None),
                }
            }
            LookupKey::AccessionNumber(acc) => {
                // Two rows are enough to notice a collision.
                let rows = sqlx::query(&format!(
                    "SELECT id, accession_number, poem FROM {} WHERE accession_number = ?1 ORDER BY rowid ASC LIMIT 2",
                    self.table
                ))
                .bind(acc)
                .fetch_all(&self.pool)
                .await
                .map_err(unavailable)?;
                if rows.len() > 1 {
                    warn!(accession_number = %acc, "accession number shared by several poems; using the earliest");
                }
                match rows.first() {
                    Some(row) => Self::decode_row(row),
                    None => Ok(None),
                }
            }
        }
    }

    async fn put(&self, poem: &Poem) -> Result<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, accession_number, poem) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                accession_number = excluded.accession_number,
                poem = excluded.poem
            "#,
            self.table
        ))
        .bind(&poem.id)
        .bind(&poem.accession_number)
        .bind(&poem.text)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::store_unavailable(format!("could not write poem to the database: {}", e)))?;
        Ok(())
    }

    async fn put_if_absent(&self, poem: &Poem) -> Result<()> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (id, accession_number, poem) VALUES (?1, ?2, ?3) ON CONFLICT(id) DO NOTHING",
            self.table
        ))
        .bind(&poem.id)
        .bind(&poem.accession_number)
        .bind(&poem.text)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::store_unavailable(format!("could not write poem to the database: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::AlreadyExists {
                id: poem.id.clone(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
