//! OCR upload response shape.
//!
//! The `/api/invoices/ocr-upload` endpoint accepts an invoice image and
//! returns structured student fields with a confidence score in `[0, 1]`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OcrExtractedData {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OcrResponse {
    pub success: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub extracted_data: Option<OcrExtractedData>,
    /// Set on failure instead of `extracted_data`.
    #[serde(default)]
    pub error: Option<String>,
}

impl OcrResponse {
    pub fn confidence_in_range(&self) -> bool {
        match self.confidence_score {
            Some(score) => (0.0..=1.0).contains(&score),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_response_decodes() {
        let json = r#"{
            "success": true,
            "confidence_score": 0.87,
            "extracted_data": {
                "student_name": "Sarah Johnson",
                "student_id": "CS2024001",
                "department": "Computer Science"
            }
        }"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert!(response.confidence_in_range());
        let data = response.extracted_data.unwrap();
        assert_eq!(data.student_name.as_deref(), Some("Sarah Johnson"));
    }

    #[test]
    fn test_failure_response_decodes() {
        let json = r#"{"success": false, "error": "no text regions found"}"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(!response.confidence_in_range());
        assert_eq!(response.error.as_deref(), Some("no text regions found"));
    }

    #[test]
    fn test_out_of_range_confidence_is_flagged() {
        let json = r#"{"success": true, "confidence_score": 1.3}"#;
        let response: OcrResponse = serde_json::from_str(json).unwrap();
        assert!(!response.confidence_in_range());
    }
}
