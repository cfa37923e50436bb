//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test --test api_tests -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:3000/api";

/// Serial numbers are unique, so each test registers its own
fn unique_serial(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn register_equipment(client: &Client, team_id: Option<i64>) -> Value {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({
            "name": "Hydraulic Press",
            "serialNumber": unique_serial("HP"),
            "location": "Hall A",
            "department": "Production",
            "purchaseDate": "2023-04-01T00:00:00.000Z",
            "warrantyEnd": null,
            "maintenanceTeamId": team_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn report_breakdown(client: &Client, equipment_id: i64) -> Value {
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "title": "Oil leak",
            "description": "Puddle under the press",
            "type": "CORRECTIVE",
            "priority": "HIGH",
            "equipmentId": equipment_id,
            "status": "REPAIRED"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn get_equipment(client: &Client, id: i64) -> Value {
    client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_teams_and_users() {
    let client = Client::new();

    let teams: Value = client
        .get(format!("{}/teams", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(teams.is_array());

    let users: Value = client
        .get(format!("{}/users", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(users.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_request_starts_new() {
    let client = Client::new();
    let equipment = register_equipment(&client, None).await;
    assert_eq!(equipment["status"], "OPERATIONAL");

    let request = report_breakdown(&client, equipment["id"].as_i64().expect("No equipment ID")).await;
    assert_eq!(request["status"], "NEW");
    assert_eq!(request["type"], "CORRECTIVE");
}

#[tokio::test]
#[ignore]
async fn test_scrap_marks_equipment_unusable() {
    let client = Client::new();
    let equipment = register_equipment(&client, None).await;
    let equipment_id = equipment["id"].as_i64().expect("No equipment ID");
    let request = report_breakdown(&client, equipment_id).await;
    let request_id = request["id"].as_i64().expect("No request ID");

    let response = client
        .patch(format!("{}/requests/{}/status", BASE_URL, request_id))
        .json(&json!({ "status": "SCRAP" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "SCRAP");

    let equipment = get_equipment(&client, equipment_id).await;
    assert_eq!(equipment["status"], "UNUSABLE");
}

#[tokio::test]
#[ignore]
async fn test_repair_then_assign() {
    let client = Client::new();
    let equipment = register_equipment(&client, None).await;
    let equipment_id = equipment["id"].as_i64().expect("No equipment ID");
    let request = report_breakdown(&client, equipment_id).await;
    let request_id = request["id"].as_i64().expect("No request ID");

    let body: Value = client
        .patch(format!("{}/requests/{}/status", BASE_URL, request_id))
        .json(&json!({ "status": "REPAIRED", "duration": 3 }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["status"], "REPAIRED");
    assert_eq!(body["duration"], 3);
    assert_eq!(get_equipment(&client, equipment_id).await["status"], "OPERATIONAL");

    let users: Value = client
        .get(format!("{}/users", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let Some(user_id) = users[0]["id"].as_i64() else {
        return; // no technicians seeded
    };

    let response = client
        .patch(format!("{}/requests/{}/assign", BASE_URL, request_id))
        .json(&json!({ "userId": user_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "IN_PROGRESS");
    assert_eq!(body["assignedTo"]["id"], user_id);
}

#[tokio::test]
#[ignore]
async fn test_history_newest_first() {
    let client = Client::new();
    let equipment = register_equipment(&client, None).await;
    let equipment_id = equipment["id"].as_i64().expect("No equipment ID");
    let first = report_breakdown(&client, equipment_id).await;
    let second = report_breakdown(&client, equipment_id).await;

    let history: Value = client
        .get(format!("{}/equipment/{}/requests", BASE_URL, equipment_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(history[0]["id"], second["id"]);
    assert_eq!(history[1]["id"], first["id"]);
}

#[tokio::test]
#[ignore]
async fn test_invalid_input_is_rejected() {
    let client = Client::new();
    let equipment = register_equipment(&client, None).await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .json(&json!({
            "title": "Odd",
            "type": "URGENT",
            "priority": "HIGH",
            "equipmentId": equipment["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .patch(format!("{}/requests/{}/status", BASE_URL, i32::MAX))
        .json(&json!({ "status": "SCRAP" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body.as_array().expect("Stats should be an array");
    for entry in entries {
        assert!(entry["name"].is_string());
        assert!(entry["value"].is_number());
    }
}
