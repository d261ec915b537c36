//! Order domain models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO for one requested line of an order.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateOrderItemDto {
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity_requested: i32,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// DTO for creating an order through the API.
///
/// `student_id` is the internal row id of the borrowing student, not the
/// external student identifier.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateOrderDto {
    pub student_id: String,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItemDto>,
}

/// The interesting parts of a created order; the API returns more.
#[derive(Deserialize, Debug, Clone)]
pub struct OrderCreated {
    pub id: String,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateOrderDto {
        CreateOrderDto {
            student_id: "s-1".to_string(),
            expected_return_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            notes: Some("lab session".to_string()),
            items: vec![CreateOrderItemDto {
                product_id: "p-1".to_string(),
                quantity_requested: 2,
                expected_return_date: None,
                notes: None,
            }],
        }
    }

    #[test]
    fn test_create_order_dto_valid() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_create_order_dto_requires_items() {
        let mut dto = valid_dto();
        dto.items.clear();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_order_dto_zero_quantity() {
        let mut dto = valid_dto();
        dto.items[0].quantity_requested = 0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_order_created_tolerates_missing_total() {
        let created: OrderCreated = serde_json::from_str(r#"{"id": "o-1"}"#).unwrap();
        assert_eq!(created.id, "o-1");
        assert!(created.total_value.is_none());
    }
}
