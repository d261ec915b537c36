//! # Stocktake Probe
//!
//! Development-time probes for the inventory system: connect to the
//! database and the HTTP API, exercise the documented surface, and report
//! one outcome line per check. A failing probe never aborts the harness;
//! it records its outcome and the next probe runs.
//!
//! This is a smoke harness for development, not a production health check.
//!
//! - [`db`]: table listing and row counts
//! - [`http`]: GET/POST passes over the REST endpoints
//! - [`ocr`]: multipart upload to the invoice OCR endpoint
//! - [`payload`]: generated sample payloads, keyed with a `PRB` prefix
//! - [`report`]: outcome types shared by all probes

pub mod db;
pub mod http;
pub mod ocr;
pub mod payload;
pub mod report;

pub use db::probe_database;
pub use http::{HttpProbe, cleanup_created_rows};
pub use ocr::probe_ocr;
pub use report::{ProbeOutcome, ProbeStatus};
