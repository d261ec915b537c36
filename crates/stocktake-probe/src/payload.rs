//! Generated sample payloads for the HTTP probes.
//!
//! Every key the probes insert carries the `PRB` prefix so cleanup can
//! target exactly the rows the harness created and nothing else.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::name::en::Name;
use rand::Rng;
use stocktake_models::orders::{CreateOrderDto, CreateOrderItemDto};
use stocktake_models::products::CreateProductDto;
use stocktake_models::students::CreateStudentDto;

/// Prefix on every probe-inserted external key.
pub const PROBE_KEY_PREFIX: &str = "PRB";

fn probe_tag() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{PROBE_KEY_PREFIX}{n:06}")
}

pub fn sample_student() -> CreateStudentDto {
    let tag = probe_tag();
    let name: String = Name().fake();
    CreateStudentDto {
        email: format!("{}@probe.example.com", tag.to_lowercase()),
        student_id: tag,
        name,
        phone: Some("1234567890".to_string()),
        department: Some("Computer Science".to_string()),
        year_of_study: rand::thread_rng().gen_range(1..=4),
        course: "Computer Science".to_string(),
        address: None,
    }
}

pub fn sample_product() -> CreateProductDto {
    let tag = probe_tag();
    CreateProductDto {
        name: format!("Probe Item {tag}"),
        sku: format!("{PROBE_KEY_PREFIX}-SKU-{}", &tag[PROBE_KEY_PREFIX.len()..]),
        description: Some("inserted by the probe harness".to_string()),
        category_id: None,
        quantity_total: 5,
        quantity_available: 5,
        is_returnable: true,
        unit_price: 10.0,
        location: Some("probe shelf".to_string()),
        minimum_stock_level: Some(1),
    }
}

/// An order for one unit of `product_id`, due back in two weeks.
pub fn sample_order(student_row_id: &str, product_row_id: &str) -> CreateOrderDto {
    let due = (Utc::now() + Duration::days(14)).date_naive();
    CreateOrderDto {
        student_id: student_row_id.to_string(),
        expected_return_date: Some(due),
        notes: Some("probe harness order".to_string()),
        items: vec![CreateOrderItemDto {
            product_id: product_row_id.to_string(),
            quantity_requested: 1,
            expected_return_date: Some(due),
            notes: None,
        }],
    }
}
