//! Student domain models and DTOs.
//!
//! Students are identified externally by `student_id` (e.g. `CS2024001`),
//! distinct from the internal row id the database assigns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A student as returned by the inventory API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Student {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Nullable; older rows predate the column being relaxed.
    pub department: Option<String>,
    pub year_of_study: Option<i32>,
    pub course: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// DTO for creating a new student through the API.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub student_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 1, max = 8))]
    pub year_of_study: i32,
    #[validate(length(min = 1, max = 100))]
    pub course: String,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateStudentDto {
        CreateStudentDto {
            student_id: "TEST001".to_string(),
            name: "Test Student".to_string(),
            email: "test@example.com".to_string(),
            phone: Some("1234567890".to_string()),
            department: None,
            year_of_study: 1,
            course: "Computer Science".to_string(),
            address: None,
        }
    }

    #[test]
    fn test_create_student_dto_valid() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_invalid_email() {
        let mut dto = valid_dto();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_empty_student_id() {
        let mut dto = valid_dto();
        dto.student_id = "".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_year_out_of_range() {
        let mut dto = valid_dto();
        dto.year_of_study = 0;
        assert!(dto.validate().is_err());
        dto.year_of_study = 9;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_student_deserializes_without_is_active() {
        // Rows created before the is_active column default to active.
        let json = r#"{
            "id": "b9f9c2e8-0000-0000-0000-000000000001",
            "student_id": "CS2024001",
            "name": "Sarah Johnson",
            "email": null,
            "phone": null,
            "department": "Computer Science",
            "year_of_study": 2,
            "course": "B.Sc.",
            "address": null
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert!(student.is_active);
        assert_eq!(student.student_id, "CS2024001");
    }
}
