//! Product domain models and DTOs.
//!
//! Products are keyed externally by SKU. Stock levels carry the invariant
//! `0 <= quantity_available <= quantity_total`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// A product as returned by the inventory API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub quantity_total: i32,
    pub quantity_available: i32,
    pub is_returnable: bool,
    pub unit_price: f64,
    pub location: Option<String>,
    pub minimum_stock_level: Option<i32>,
    pub status: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: Option<Value>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub date_of_purchase: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Stock-level invariant: available never exceeds total, neither negative.
    pub fn quantities_consistent(&self) -> bool {
        self.quantity_available >= 0 && self.quantity_available <= self.quantity_total
    }
}

/// DTO for creating a new product through the API.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    #[validate(range(min = 0))]
    pub quantity_total: i32,
    #[validate(range(min = 0))]
    pub quantity_available: i32,
    pub is_returnable: bool,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub minimum_stock_level: Option<i32>,
}

impl CreateProductDto {
    pub fn quantities_consistent(&self) -> bool {
        self.quantity_available >= 0 && self.quantity_available <= self.quantity_total
    }
}
