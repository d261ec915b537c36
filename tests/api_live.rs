//! Live HTTP API tests.
//!
//! These exercise a running inventory API (`API_BASE_URL`, default
//! `http://localhost:8000`) and clean their rows up through the database.
//! Ignored by default; run with `cargo test -- --ignored`.

use serde_json::{Value, json};
use stocktake_config::{ApiConfig, DbConfig};
use stocktake_db::Db;
use uuid::Uuid;

fn client(config: &ApiConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .unwrap()
}

fn test_key(prefix: &str) -> String {
    // TEST prefix so cleanup can never touch real rows.
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("{prefix}{suffix}")
}

async fn delete_student(key: &str) {
    dotenvy::dotenv().ok();
    if let Ok(db) = Db::open(&DbConfig::from_env()).await {
        let _ = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(key)
            .execute(db.pool())
            .await;
        db.close().await;
    }
}

async fn delete_product(sku: &str) {
    dotenvy::dotenv().ok();
    if let Ok(db) = Db::open(&DbConfig::from_env()).await {
        let _ = sqlx::query("DELETE FROM products WHERE sku = $1")
            .bind(sku)
            .execute(db.pool())
            .await;
        db.close().await;
    }
}

#[tokio::test]
#[ignore = "requires the inventory API to be running"]
async fn test_health_responds_with_json() {
    let config = ApiConfig::from_env();
    let response = client(&config)
        .get(config.endpoint("/health"))
        .send()
        .await
        .expect("API must be reachable");
    assert!(response.status().is_success());
    response.json::<Value>().await.expect("health body is JSON");
}

#[tokio::test]
#[ignore = "requires the inventory API and database to be running"]
async fn test_student_create_then_lookup_echoes_fields() {
    let config = ApiConfig::from_env();
    let key = test_key("TEST");

    let payload = json!({
        "student_id": key,
        "name": "Test Student",
        "email": "test@example.com",
        "phone": "1234567890",
        "year_of_study": 1,
        "course": "Computer Science"
    });

    let response = client(&config)
        .post(config.endpoint("/students"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert!(
        response.status().is_success(),
        "create returned {}",
        response.status()
    );

    let response = client(&config)
        .get(config.endpoint(&format!("/students/by-student-id/{key}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["student_id"], payload["student_id"]);
    assert_eq!(body["name"], payload["name"]);
    assert_eq!(body["email"], payload["email"]);
    assert_eq!(body["course"], payload["course"]);

    delete_student(&key).await;
}

#[tokio::test]
#[ignore = "requires the inventory API to be running"]
async fn test_lookup_of_absent_student_is_404() {
    let config = ApiConfig::from_env();
    let response = client(&config)
        .get(config.endpoint("/students/by-student-id/TESTNOSUCH"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires the inventory API and database to be running"]
async fn test_duplicate_sku_is_rejected_with_the_offending_key() {
    let config = ApiConfig::from_env();
    let sku = test_key("TESTSKU");

    let payload = json!({
        "name": "Test Product",
        "sku": sku,
        "quantity_total": 3,
        "quantity_available": 3,
        "is_returnable": true,
        "unit_price": 9.99
    });

    let first = client(&config)
        .post(config.endpoint("/products"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert!(first.status().is_success());

    // Round trip: the listing must now contain the posted SKU.
    let listing: Value = client(&config)
        .get(config.endpoint("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let found = listing
        .as_array()
        .is_some_and(|items| items.iter().any(|p| p["sku"] == payload["sku"]));
    assert!(found, "GET /products must list the created SKU");

    let second = client(&config)
        .post(config.endpoint("/products"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert!(
        !second.status().is_success(),
        "duplicate SKU must be rejected"
    );
    let body = second.text().await.unwrap();
    assert!(body.contains(&sku), "conflict error must name the SKU");

    delete_product(&sku).await;
}
