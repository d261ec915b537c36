//! Database-side probe: table listing and row counts.

use stocktake_bootstrap::introspect::list_tables;
use stocktake_db::Db;
use tracing::debug;

use crate::report::ProbeOutcome;

/// Tables the inventory schema is expected to carry.
pub const EXPECTED_TABLES: [&str; 9] = [
    "categories",
    "products",
    "students",
    "orders",
    "order_items",
    "invoices",
    "lenders",
    "product_transactions",
    "users",
];

/// Lists the schema's tables and counts rows in each expected one.
///
/// Missing and empty tables are soft findings; only a broken connection
/// produces a hard failure.
pub async fn probe_database(db: &Db) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::new();

    let tables = match list_tables(db).await {
        Ok(tables) => tables,
        Err(e) => {
            outcomes.push(ProbeOutcome::failed("list tables", format!("{e:#}")));
            return outcomes;
        }
    };
    outcomes.push(ProbeOutcome::ok(
        "schema",
        format!("{} tables in public schema", tables.len()),
    ));

    for table in EXPECTED_TABLES {
        if !tables.iter().any(|t| t == table) {
            outcomes.push(ProbeOutcome::soft(format!("table {table}"), "missing"));
            continue;
        }
        // `table` comes from the fixed list above, never from input, so it
        // may appear as an identifier here.
        let count: Result<i64, sqlx::Error> =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(db.pool())
                .await;
        match count {
            Ok(0) => outcomes.push(ProbeOutcome::soft(format!("table {table}"), "empty")),
            Ok(n) => {
                debug!(%table, rows = n, "counted table");
                outcomes.push(ProbeOutcome::ok(format!("table {table}"), format!("{n} rows")));
            }
            Err(e) => outcomes.push(ProbeOutcome::failed(format!("table {table}"), e.to_string())),
        }
    }

    outcomes
}
