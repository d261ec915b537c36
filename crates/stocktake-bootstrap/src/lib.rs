//! # Stocktake Bootstrap
//!
//! Idempotent schema-bootstrap routines for the inventory database.
//!
//! Each routine queries the information schema to decide whether its change
//! is already applied, so running the batch against a database at target
//! schema emits no DDL and inserts no rows. Routines are independent: they
//! commit on their own and a failure in one never aborts the others.
//!
//! # Example
//!
//! ```ignore
//! use stocktake_bootstrap::run_all;
//!
//! let reports = run_all(&db, "admin123").await;
//! for report in &reports {
//!     println!("{}: {}", report.name, report.outcome);
//! }
//! ```

pub mod auth;
pub mod introspect;
pub mod routines;

pub use routines::{Outcome, RoutineReport, run_all};
