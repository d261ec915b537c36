//! User-management tables and the seeded administrator.
//!
//! First creation of the `users` table is followed by inserting exactly one
//! `main_admin` row. If any user already exists the seeding is skipped, so
//! re-running bootstrap never overwrites credentials.

use anyhow::{Context, Result};
use bcrypt::{DEFAULT_COST, hash};
use stocktake_db::Db;
use stocktake_models::users::{default_admin, roles};
use tracing::info;
use uuid::Uuid;

use crate::introspect::table_exists;
use crate::routines::Outcome;

pub(crate) const CREATE_USERS_TABLE_SQL: &str = "
    CREATE TABLE users (
        id            VARCHAR(36) PRIMARY KEY,
        username      VARCHAR(100) NOT NULL UNIQUE,
        email         VARCHAR(200),
        password_hash VARCHAR(200) NOT NULL,
        full_name     VARCHAR(200),
        role          VARCHAR(50) NOT NULL,
        status        VARCHAR(50) NOT NULL DEFAULT 'active',
        is_active     BOOLEAN NOT NULL DEFAULT true,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

pub(crate) const CREATE_USER_SESSIONS_TABLE_SQL: &str = "
    CREATE TABLE user_sessions (
        id         VARCHAR(36) PRIMARY KEY,
        user_id    VARCHAR(36) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        token      VARCHAR(500) NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

pub(crate) const CREATE_AUDIT_LOG_TABLE_SQL: &str = "
    CREATE TABLE audit_log (
        id         VARCHAR(36) PRIMARY KEY,
        user_id    VARCHAR(36) REFERENCES users(id) ON DELETE SET NULL,
        action     VARCHAR(200) NOT NULL,
        details    TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

pub(crate) const CREATE_SYSTEM_SETTINGS_TABLE_SQL: &str = "
    CREATE TABLE system_settings (
        key        VARCHAR(100) PRIMARY KEY,
        value      TEXT,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

/// Ensures the user-management tables exist and, on a virgin `users` table,
/// seeds the single `main_admin` account with `default_password`.
pub async fn create_auth_tables(db: &Db, default_password: &str) -> Result<Outcome> {
    let mut created_any = false;
    for (table, ddl) in [
        ("users", CREATE_USERS_TABLE_SQL),
        ("user_sessions", CREATE_USER_SESSIONS_TABLE_SQL),
        ("audit_log", CREATE_AUDIT_LOG_TABLE_SQL),
        ("system_settings", CREATE_SYSTEM_SETTINGS_TABLE_SQL),
    ] {
        if !table_exists(db, table).await? {
            db.execute(ddl).await?;
            info!(%table, "created table");
            created_any = true;
        }
    }

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db.pool())
        .await?;

    if user_count == 0 {
        seed_main_admin(db, default_password).await?;
        info!(username = default_admin::USERNAME, "seeded main administrator");
        return Ok(Outcome::Applied);
    }

    if created_any {
        Ok(Outcome::Applied)
    } else {
        Ok(Outcome::AlreadyApplied)
    }
}

async fn seed_main_admin(db: &Db, password: &str) -> Result<()> {
    let password_hash =
        hash(password, DEFAULT_COST).context("failed to hash administrator password")?;

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(default_admin::USERNAME)
    .bind(default_admin::EMAIL)
    .bind(&password_hash)
    .bind("Main Administrator")
    .bind(roles::MAIN_ADMIN)
    .execute(db.pool())
    .await
    .context("failed to insert seeded administrator")?;

    Ok(())
}
