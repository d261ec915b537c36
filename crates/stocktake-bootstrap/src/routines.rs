//! The schema-bootstrap routines.
//!
//! Each routine guards its own precondition against the information schema,
//! so the batch can run in any order and any number of times. A column that
//! exists with an unexpected type is reported and left alone.

use std::fmt;

use anyhow::Result;
use stocktake_db::Db;
use tracing::{info, warn};

use crate::auth;
use crate::introspect::{column_data_type, column_is_nullable, table_exists};

/// What a routine did, or why it could not.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    AlreadyApplied,
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => write!(f, "applied"),
            Outcome::AlreadyApplied => write!(f, "already applied"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One routine's result within a batch run.
#[derive(Debug)]
pub struct RoutineReport {
    pub name: &'static str,
    pub outcome: Outcome,
}

pub(crate) const CREATE_STUDENTS_TABLE_SQL: &str = "
    CREATE TABLE students (
        id            VARCHAR(36) PRIMARY KEY,
        student_id    VARCHAR(50) NOT NULL UNIQUE,
        name          VARCHAR(200) NOT NULL,
        email         VARCHAR(200),
        phone         VARCHAR(20),
        department    VARCHAR(100),
        year_of_study INTEGER,
        course        VARCHAR(100),
        address       TEXT,
        is_active     BOOLEAN NOT NULL DEFAULT true,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

/// Creates the `students` table when absent.
pub async fn create_students_table(db: &Db) -> Result<Outcome> {
    if table_exists(db, "students").await? {
        return Ok(Outcome::AlreadyApplied);
    }
    db.execute(CREATE_STUDENTS_TABLE_SQL).await?;
    info!("created table students");
    Ok(Outcome::Applied)
}

/// Drops the NOT NULL constraint on `students.department` when present.
pub async fn relax_students_department(db: &Db) -> Result<Outcome> {
    match column_is_nullable(db, "students", "department").await? {
        None => Ok(Outcome::Failed(
            "column students.department does not exist".to_string(),
        )),
        Some(true) => Ok(Outcome::AlreadyApplied),
        Some(false) => {
            db.execute("ALTER TABLE students ALTER COLUMN department DROP NOT NULL")
                .await?;
            info!("relaxed students.department to nullable");
            Ok(Outcome::Applied)
        }
    }
}

/// Adds `products.is_active BOOLEAN NOT NULL DEFAULT true` when missing.
pub async fn add_products_is_active(db: &Db) -> Result<Outcome> {
    add_column_checked(
        db,
        "products",
        "is_active",
        "boolean",
        "ALTER TABLE products ADD COLUMN is_active BOOLEAN NOT NULL DEFAULT true",
    )
    .await
}

/// Adds `product_transactions.performed_by VARCHAR(200)` (nullable) when missing.
pub async fn add_product_transactions_performed_by(db: &Db) -> Result<Outcome> {
    add_column_checked(
        db,
        "product_transactions",
        "performed_by",
        "character varying",
        "ALTER TABLE product_transactions ADD COLUMN performed_by VARCHAR(200)",
    )
    .await
}

/// Shared add-column guard: skip when the column exists with the expected
/// type, report a mismatch without mutating otherwise.
async fn add_column_checked(
    db: &Db,
    table: &str,
    column: &str,
    expected_type: &str,
    alter_sql: &str,
) -> Result<Outcome> {
    if !table_exists(db, table).await? {
        return Ok(Outcome::Failed(format!("table {table} does not exist")));
    }
    match column_data_type(db, table, column).await? {
        Some(data_type) if data_type == expected_type => Ok(Outcome::AlreadyApplied),
        Some(data_type) => {
            warn!(%table, %column, %data_type, "column exists with unexpected type, leaving it alone");
            Ok(Outcome::Failed(format!(
                "column {table}.{column} exists as {data_type}, expected {expected_type}"
            )))
        }
        None => {
            db.execute(alter_sql).await?;
            info!(%table, %column, "added column");
            Ok(Outcome::Applied)
        }
    }
}

/// Runs every routine, collecting one report each. A routine's error is
/// captured in its report; the rest of the batch still runs.
pub async fn run_all(db: &Db, admin_password: &str) -> Vec<RoutineReport> {
    let mut reports = Vec::new();
    reports.push(report(
        "create_students_table",
        create_students_table(db).await,
    ));
    reports.push(report(
        "relax_students_department",
        relax_students_department(db).await,
    ));
    reports.push(report(
        "add_products_is_active",
        add_products_is_active(db).await,
    ));
    reports.push(report(
        "add_product_transactions_performed_by",
        add_product_transactions_performed_by(db).await,
    ));
    reports.push(report(
        "create_auth_tables",
        auth::create_auth_tables(db, admin_password).await,
    ));
    reports
}

fn report(name: &'static str, result: Result<Outcome>) -> RoutineReport {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Failed(format!("{e:#}")),
    };
    RoutineReport { name, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_ddl_shape() {
        // department must be created nullable; student_id carries the
        // external unique key.
        let ddl = CREATE_STUDENTS_TABLE_SQL;
        assert!(ddl.contains("student_id    VARCHAR(50) NOT NULL UNIQUE"));
        assert!(ddl.contains("department    VARCHAR(100),"));
        assert!(!ddl.contains("department    VARCHAR(100) NOT NULL"));
        assert!(ddl.contains("is_active     BOOLEAN NOT NULL DEFAULT true"));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Applied.to_string(), "applied");
        assert_eq!(Outcome::AlreadyApplied.to_string(), "already applied");
        assert_eq!(
            Outcome::Failed("no privilege".to_string()).to_string(),
            "failed: no privilege"
        );
    }

    #[test]
    fn test_report_wraps_errors_as_failed() {
        let wrapped = report("create_students_table", Err(anyhow::anyhow!("boom")));
        assert_eq!(wrapped.name, "create_students_table");
        assert!(matches!(wrapped.outcome, Outcome::Failed(ref r) if r.contains("boom")));
    }
}
