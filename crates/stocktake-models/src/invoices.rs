//! Invoice domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An invoice summary as returned by `GET /invoices`.
///
/// Item rows come from the dedicated `/invoices/{id}/items` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvoiceSummary {
    pub id: String,
    /// External unique key, e.g. `LEN009`.
    pub invoice_number: String,
    pub student_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_summary_decodes() {
        let json = r#"{
            "id": "i-1",
            "invoice_number": "LEN009",
            "student_id": "s-1",
            "order_id": null
        }"#;
        let invoice: InvoiceSummary = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.invoice_number, "LEN009");
        assert!(invoice.order_id.is_none());
    }
}
