//! Live schema-bootstrap tests.
//!
//! These run against a real PostgreSQL instance configured through the
//! usual environment variables (`DATABASE_URL` or `DB_*`). They are ignored
//! by default; run them with `cargo test -- --ignored` once a database is
//! reachable.

use stocktake_bootstrap::{Outcome, run_all};
use stocktake_config::DbConfig;
use stocktake_db::Db;
use stocktake_models::users::roles;

async fn open_db() -> Db {
    dotenvy::dotenv().ok();
    Db::open(&DbConfig::from_env())
        .await
        .expect("bootstrap tests need a reachable database")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_second_bootstrap_run_is_a_no_op() {
    let db = open_db().await;

    let first = run_all(&db, "admin123").await;
    for report in &first {
        assert!(
            !matches!(report.outcome, Outcome::Failed(_)),
            "{} failed on first run: {}",
            report.name,
            report.outcome
        );
    }

    let second = run_all(&db, "admin123").await;
    for report in &second {
        assert_eq!(
            report.outcome,
            Outcome::AlreadyApplied,
            "{} must detect its change as already applied",
            report.name
        );
    }

    db.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_exactly_one_main_admin_survives_rebootstrap() {
    let db = open_db().await;

    run_all(&db, "admin123").await;
    let before: Option<(String,)> =
        sqlx::query_as("SELECT username FROM users WHERE role = $1")
            .bind(roles::MAIN_ADMIN)
            .fetch_optional(db.pool())
            .await
            .unwrap();
    let before = before.expect("bootstrap must seed a main_admin").0;

    run_all(&db, "a-different-password").await;
    let after: Vec<(String,)> = sqlx::query_as("SELECT username FROM users WHERE role = $1")
        .bind(roles::MAIN_ADMIN)
        .fetch_all(db.pool())
        .await
        .unwrap();

    assert_eq!(after.len(), 1, "exactly one main_admin after any bootstrap");
    assert_eq!(after[0].0, before, "re-running bootstrap never reseeds");

    db.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_products_is_active_is_non_null_after_bootstrap() {
    let db = open_db().await;

    run_all(&db, "admin123").await;
    let nulls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active IS NULL")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(nulls, 0);

    db.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_retrofitted_columns_have_the_expected_shape() {
    use stocktake_bootstrap::introspect::{column_data_type, column_exists, column_is_nullable};

    let db = open_db().await;
    run_all(&db, "admin123").await;

    if column_exists(&db, "products", "is_active").await.unwrap() {
        assert_eq!(
            column_data_type(&db, "products", "is_active").await.unwrap(),
            Some("boolean".to_string())
        );
    }
    if column_exists(&db, "product_transactions", "performed_by")
        .await
        .unwrap()
    {
        assert_eq!(
            column_is_nullable(&db, "product_transactions", "performed_by")
                .await
                .unwrap(),
            Some(true),
            "performed_by is added nullable"
        );
    }

    db.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_student_ids_are_unique() {
    let db = open_db().await;

    run_all(&db, "admin123").await;
    let duplicated: Vec<(String, i64)> = sqlx::query_as(
        "SELECT student_id, COUNT(*) FROM students
         GROUP BY student_id HAVING COUNT(*) > 1",
    )
    .fetch_all(db.pool())
    .await
    .unwrap();
    assert!(duplicated.is_empty(), "duplicated student ids: {duplicated:?}");

    db.close().await;
}
