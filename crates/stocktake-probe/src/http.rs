//! HTTP-side probe: a GET pass over the documented endpoints, then a
//! create/lookup/conflict pass with generated payloads.
//!
//! Paths follow the API's documented surface: entity endpoints are
//! unprefixed, the OCR and auth endpoints live under `/api`.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use stocktake_config::ApiConfig;
use stocktake_db::Db;
use tracing::debug;

use crate::payload::{sample_order, sample_product, sample_student};
use crate::report::ProbeOutcome;

/// Endpoints covered by the read-only pass.
const GET_ENDPOINTS: [&str; 6] = [
    "/health",
    "/students",
    "/categories",
    "/products",
    "/orders",
    "/invoices",
];

/// External keys and row ids of everything the write pass inserted.
#[derive(Debug, Default, Clone)]
pub struct CreatedRows {
    pub student_row_id: Option<String>,
    pub student_key: Option<String>,
    pub product_row_id: Option<String>,
    pub product_sku: Option<String>,
    pub order_id: Option<String>,
}

/// Outcomes of one harness run plus the rows it created.
#[derive(Debug)]
pub struct HttpProbeRun {
    pub outcomes: Vec<ProbeOutcome>,
    pub created: CreatedRows,
}

pub struct HttpProbe {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpProbe {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Runs the full probe pass. Individual failures are recorded and the
    /// pass continues; only the returned outcomes say how it went.
    pub async fn run(&self) -> HttpProbeRun {
        let mut outcomes = Vec::new();
        let mut created = CreatedRows::default();

        for path in GET_ENDPOINTS {
            outcomes.push(self.get_outcome(path).await);
        }
        // Auth listing lives under the /api prefix.
        outcomes.push(self.get_outcome("/api/auth/users").await);
        self.invoice_drilldown(&mut outcomes).await;

        self.student_round_trip(&mut outcomes, &mut created).await;
        self.product_conflict_check(&mut outcomes, &mut created).await;
        self.order_create(&mut outcomes, &mut created).await;

        HttpProbeRun { outcomes, created }
    }

    async fn get_outcome(&self, path: &str) -> ProbeOutcome {
        let label = format!("GET {path}");
        let response = match self.client.get(self.config.endpoint(path)).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return ProbeOutcome::failed(
                    label,
                    format!("timed out after {}s", self.config.timeout_seconds),
                );
            }
            Err(e) => return ProbeOutcome::failed(label, e.to_string()),
        };

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();
        let detail = match &body {
            Some(value) => format!("{}, {}", status.as_u16(), payload_count(value)),
            None => format!("{}, non-JSON body", status.as_u16()),
        };
        if status.is_success() {
            ProbeOutcome::ok(label, detail)
        } else if status == StatusCode::NOT_FOUND {
            ProbeOutcome::soft(label, detail)
        } else {
            ProbeOutcome::failed(label, detail)
        }
    }

    /// Follow the first listed invoice into its detail and item endpoints.
    async fn invoice_drilldown(&self, outcomes: &mut Vec<ProbeOutcome>) {
        let listing = self
            .client
            .get(self.config.endpoint("/invoices"))
            .send()
            .await;
        let first_id = match listing {
            Ok(response) if response.status().is_success() => response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.as_array()
                        .and_then(|a| a.first())
                        .and_then(|i| i.get("id"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                }),
            _ => None,
        };

        let Some(id) = first_id else {
            outcomes.push(ProbeOutcome::soft(
                "GET /invoices/{id}",
                "skipped, no invoice to drill into",
            ));
            return;
        };

        for suffix in ["", "/items"] {
            let path = format!("/invoices/{id}{suffix}");
            let mut outcome = self.get_outcome(&path).await;
            outcome.label = format!("GET /invoices/{{id}}{suffix}");
            outcomes.push(outcome);
        }
    }

    /// POST a student, then read it back by external id and compare fields.
    async fn student_round_trip(&self, outcomes: &mut Vec<ProbeOutcome>, created: &mut CreatedRows) {
        let student = sample_student();
        let key = student.student_id.clone();

        let (status, body) = match self.post_json("/students", &student).await {
            Ok(pair) => pair,
            Err(e) => {
                outcomes.push(ProbeOutcome::failed("POST /students", format!("{e:#}")));
                return;
            }
        };
        if !status.is_success() {
            outcomes.push(ProbeOutcome::failed(
                "POST /students",
                format!("{}, expected 2xx", status.as_u16()),
            ));
            return;
        }
        created.student_key = Some(key.clone());
        created.student_row_id = body
            .as_ref()
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        outcomes.push(ProbeOutcome::ok(
            "POST /students",
            format!("{}, created {key}", status.as_u16()),
        ));

        let label = format!("GET /students/by-student-id/{key}");
        let path = format!("/students/by-student-id/{key}");
        match self.client.get(self.config.endpoint(&path)).send().await {
            Ok(response) if response.status().is_success() => {
                let echoed: Option<Value> = response.json().await.ok();
                let fields_match = echoed.as_ref().is_some_and(|v| {
                    v.get("name").and_then(Value::as_str) == Some(student.name.as_str())
                        && v.get("email").and_then(Value::as_str) == Some(student.email.as_str())
                        && v.get("course").and_then(Value::as_str) == Some(student.course.as_str())
                });
                if fields_match {
                    outcomes.push(ProbeOutcome::ok(label, "200, fields echoed"));
                } else {
                    outcomes.push(ProbeOutcome::failed(label, "200 but fields differ"));
                }
            }
            Ok(response) => outcomes.push(ProbeOutcome::failed(
                label,
                format!("{}, expected 200 after create", response.status().as_u16()),
            )),
            Err(e) => outcomes.push(ProbeOutcome::failed(label, e.to_string())),
        }
    }

    /// POST a product twice with the same SKU; the second must conflict.
    async fn product_conflict_check(
        &self,
        outcomes: &mut Vec<ProbeOutcome>,
        created: &mut CreatedRows,
    ) {
        let product = sample_product();
        let sku = product.sku.clone();

        let (status, body) = match self.post_json("/products", &product).await {
            Ok(pair) => pair,
            Err(e) => {
                outcomes.push(ProbeOutcome::failed("POST /products", format!("{e:#}")));
                return;
            }
        };
        if !status.is_success() {
            outcomes.push(ProbeOutcome::failed(
                "POST /products",
                format!("{}, expected 2xx", status.as_u16()),
            ));
            return;
        }
        created.product_sku = Some(sku.clone());
        created.product_row_id = body
            .as_ref()
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        outcomes.push(ProbeOutcome::ok(
            "POST /products",
            format!("{}, created {sku}", status.as_u16()),
        ));

        let label = "POST /products (duplicate SKU)";
        match self.post_json("/products", &product).await {
            Ok((status, _)) if status.is_success() => outcomes.push(ProbeOutcome::failed(
                label,
                format!("{}, duplicate {sku} was accepted", status.as_u16()),
            )),
            Ok((status, conflict_body)) => {
                let names_key = conflict_body
                    .as_ref()
                    .map(Value::to_string)
                    .is_some_and(|s| s.contains(&sku));
                if names_key {
                    outcomes.push(ProbeOutcome::ok(
                        label,
                        format!("{}, conflict names {sku}", status.as_u16()),
                    ));
                } else {
                    outcomes.push(ProbeOutcome::soft(
                        label,
                        format!("{}, conflict without offending key", status.as_u16()),
                    ));
                }
            }
            Err(e) => outcomes.push(ProbeOutcome::failed(label, format!("{e:#}"))),
        }
    }

    /// POST an order for the student and product created earlier.
    async fn order_create(&self, outcomes: &mut Vec<ProbeOutcome>, created: &mut CreatedRows) {
        let (Some(student_id), Some(product_id)) =
            (&created.student_row_id, &created.product_row_id)
        else {
            outcomes.push(ProbeOutcome::soft(
                "POST /orders",
                "skipped, no probe student/product to reference",
            ));
            return;
        };

        let order = sample_order(student_id, product_id);
        match self.post_json("/orders", &order).await {
            Ok((status, body)) if status.is_success() => {
                created.order_id = body
                    .as_ref()
                    .and_then(|v| v.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let total = body
                    .as_ref()
                    .and_then(|v| v.get("total_value"))
                    .map(Value::to_string)
                    .unwrap_or_else(|| "?".to_string());
                outcomes.push(ProbeOutcome::ok(
                    "POST /orders",
                    format!("{}, total_value {total}", status.as_u16()),
                ));
            }
            Ok((status, _)) => outcomes.push(ProbeOutcome::failed(
                "POST /orders",
                format!("{}, expected 2xx", status.as_u16()),
            )),
            Err(e) => outcomes.push(ProbeOutcome::failed("POST /orders", format!("{e:#}"))),
        }
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(StatusCode, Option<Value>)> {
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.json().await.ok();
        debug!(%path, status = status.as_u16(), "probe POST");
        Ok((status, body))
    }
}

/// Deletes exactly the rows a probe run created, children first so the
/// foreign keys hold throughout.
pub async fn cleanup_created_rows(db: &Db, created: &CreatedRows) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::new();

    if let Some(order_id) = &created.order_id {
        let result = async {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(order_id)
                .execute(db.pool())
                .await?;
            sqlx::query("DELETE FROM orders WHERE id = $1")
                .bind(order_id)
                .execute(db.pool())
                .await
        }
        .await;
        outcomes.push(delete_outcome("order", order_id, result));
    }
    if let Some(sku) = &created.product_sku {
        let result = sqlx::query("DELETE FROM products WHERE sku = $1")
            .bind(sku)
            .execute(db.pool())
            .await;
        outcomes.push(delete_outcome("product", sku, result));
    }
    if let Some(key) = &created.student_key {
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(key)
            .execute(db.pool())
            .await;
        outcomes.push(delete_outcome("student", key, result));
    }

    outcomes
}

fn delete_outcome(
    entity: &str,
    key: &str,
    result: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
) -> ProbeOutcome {
    match result {
        Ok(done) => ProbeOutcome::ok(
            format!("cleanup {entity} {key}"),
            format!("{} rows deleted", done.rows_affected()),
        ),
        Err(e) => ProbeOutcome::failed(format!("cleanup {entity} {key}"), e.to_string()),
    }
}

/// Short description of a JSON payload for outcome lines.
fn payload_count(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(_) => "object".to_string(),
        _ => "scalar".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_count_for_lists() {
        assert_eq!(payload_count(&json!([1, 2, 3])), "3 items");
        assert_eq!(payload_count(&json!([])), "0 items");
    }

    #[test]
    fn test_payload_count_for_objects_and_scalars() {
        assert_eq!(payload_count(&json!({"status": "ok"})), "object");
        assert_eq!(payload_count(&json!(42)), "scalar");
    }
}
