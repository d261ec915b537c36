//! Information-schema queries used to detect current schema state.
//!
//! All lookups are confined to the `public` schema and pass identifiers
//! through bind parameters.

use anyhow::Result;
use stocktake_db::Db;

/// One column of a table, as described by `information_schema.columns`.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
}

pub async fn table_exists(db: &Db, table: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM information_schema.tables
             WHERE table_schema = 'public' AND table_name = $1
         )",
    )
    .bind(table)
    .fetch_one(db.pool())
    .await?;
    Ok(exists)
}

pub async fn column_exists(db: &Db, table: &str, column: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2
         )",
    )
    .bind(table)
    .bind(column)
    .fetch_one(db.pool())
    .await?;
    Ok(exists)
}

/// `None` when the column does not exist.
pub async fn column_is_nullable(db: &Db, table: &str, column: &str) -> Result<Option<bool>> {
    let nullable: Option<String> = sqlx::query_scalar(
        "SELECT is_nullable FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
    )
    .bind(table)
    .bind(column)
    .fetch_optional(db.pool())
    .await?;
    Ok(nullable.map(|v| v == "YES"))
}

/// `None` when the column does not exist.
pub async fn column_data_type(db: &Db, table: &str, column: &str) -> Result<Option<String>> {
    let data_type: Option<String> = sqlx::query_scalar(
        "SELECT data_type FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
    )
    .bind(table)
    .bind(column)
    .fetch_optional(db.pool())
    .await?;
    Ok(data_type)
}

/// All base tables in the public schema, name ascending.
pub async fn list_tables(db: &Db) -> Result<Vec<String>> {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name FROM information_schema.tables
         WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
         ORDER BY table_name",
    )
    .fetch_all(db.pool())
    .await?;
    Ok(tables)
}

/// Columns of one table in ordinal order.
pub async fn list_columns(db: &Db, table: &str) -> Result<Vec<ColumnInfo>> {
    let rows: Vec<(String, String, String, Option<String>)> = sqlx::query_as(
        "SELECT column_name, data_type, is_nullable, column_default
         FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(db.pool())
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, data_type, is_nullable, default)| ColumnInfo {
            name,
            data_type,
            is_nullable: is_nullable == "YES",
            default,
        })
        .collect())
}
