//! # Stocktake DB
//!
//! Database session helper for the stocktake toolkit.
//!
//! This crate provides the single point of contact with the inventory
//! database. Every tool opens a [`Db`], runs its statements against the
//! underlying pool, and closes it on exit.
//!
//! # Parameter binding
//!
//! Callers pass values exclusively through sqlx bind parameters
//! (`sqlx::query(sql).bind(value)`), never by interpolating them into the
//! SQL string. The tools handle user-originating data (student IDs, SKUs,
//! invoice numbers), so this rule has no exceptions.
//!
//! # Example
//!
//! ```ignore
//! use stocktake_config::DbConfig;
//! use stocktake_db::Db;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Db::open(&DbConfig::from_env()).await?;
//!     let n = db.execute("ANALYZE products").await?;
//!     db.close().await;
//!     Ok(())
//! }
//! ```

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use stocktake_config::DbConfig;
use tracing::debug;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// An open session to the inventory database.
///
/// Wraps a small connection pool. Cheap to clone; the pool is shared.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connects to the database described by `config`.
    ///
    /// `config.url` takes precedence when set; otherwise the discrete
    /// fields are assembled into [`PgConnectOptions`] so the password is
    /// never formatted into a connection string.
    pub async fn open(config: &DbConfig) -> anyhow::Result<Self> {
        let options = PgPoolOptions::new().max_connections(5);

        let pool = match &config.url {
            Some(url) => options.connect(url).await,
            None => options.connect_with(connect_options(config)).await,
        }
        .with_context(|| {
            format!(
                "failed to connect to database {:?} at {}:{}",
                config.database, config.host, config.port
            )
        })?;

        debug!(
            host = %config.host,
            database = %config.database,
            "database session opened"
        );
        Ok(Self { pool })
    }

    /// The underlying pool, for row-returning statements via
    /// `sqlx::query(...)`, `query_as`, or `query_scalar`.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Executes a statement that returns no rows (DDL, DELETE, INSERT).
    ///
    /// Each call commits independently. Returns the number of affected rows.
    pub async fn execute(&self, sql: &str) -> anyhow::Result<u64> {
        let result = sqlx::query(sql)
            .execute(&self.pool)
            .await
            .with_context(|| format!("statement failed: {}", first_line(sql)))?;
        Ok(result.rows_affected())
    }

    /// Releases the session. Safe to call more than once.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
}

/// First line of a SQL statement, for error messages on multi-line DDL.
fn first_line(sql: &str) -> &str {
    sql.trim().lines().next().unwrap_or_default()
}
