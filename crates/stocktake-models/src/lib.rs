//! # Stocktake Models
//!
//! Domain models and DTOs for the college inventory schema.
//!
//! One module per entity, mirroring the tables the toolkit touches:
//!
//! - [`students`]: students and the create DTO used by the probes
//! - [`products`]: products keyed by SKU
//! - [`orders`]: orders and their item rows
//! - [`invoices`]: invoice summaries
//! - [`users`]: administrator accounts and role-tier ordering
//! - [`ocr`]: the OCR upload response shape

pub mod invoices;
pub mod ocr;
pub mod orders;
pub mod products;
pub mod students;
pub mod users;
