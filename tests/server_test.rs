mod common;

use common::sample_service;
use serde_json::Value;
use std::sync::Arc;
use superstore_insights::config::Settings;
use superstore_insights::server::{self, AppState};
use tokio::net::TcpListener;

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState {
        service: sample_service(),
        settings: Settings::default(),
    });
    tokio::spawn(server::serve(listener, state));
    format!("http://{}", addr)
}

async fn get(base: &str, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_dashboard_endpoints() {
    let base = start_server().await;

    let (status, overview) = get(&base, "/api/sales/overview").await;
    assert_eq!(status, 200);
    assert_eq!(overview["total_sales"], 1875.0);
    assert_eq!(overview["total_profit"], 295.0);
    assert_eq!(overview["total_customers"], 3);
    assert_eq!(overview["avg_order_value"], 625.0);

    let (_, categories) = get(&base, "/api/sales/by-category").await;
    let names: Vec<&str> = categories["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["category"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Furniture", "Office Supplies", "Technology"]);

    let (_, trends) = get(&base, "/api/sales/trends").await;
    assert_eq!(trends["data"][0]["month"], "2023-01");
    assert_eq!(trends["data"][0]["sales"], 550.0);

    let (_, states) = get(&base, "/api/sales/states").await;
    assert_eq!(states["data"].as_array().unwrap().len(), 3);

    let (_, options) = get(&base, "/api/sales/filter-options").await;
    assert_eq!(options["date_range"]["min"], "2023-01-15");
    assert_eq!(options["date_range"]["max"], "2023-03-10");
}

#[tokio::test]
async fn test_query_filters() {
    let base = start_server().await;

    let (_, west) = get(&base, "/api/sales/overview?regions=West").await;
    assert_eq!(west["total_sales"], 300.0);
    assert_eq!(west["profit_margin"], -6.67);

    let (_, q1) = get(
        &base,
        "/api/sales/by-region?start_date=2023-02-01&end_date=2023-03-31&categories=Technology,Furniture",
    )
    .await;
    let regions: Vec<&str> = q1["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["region"].as_str().unwrap())
        .collect();
    assert_eq!(regions, vec!["Central", "West"]);
    assert_eq!(q1["data"][0]["sales"], 1000.0);

    let (_, empty) = get(&base, "/api/sales/profit-analysis?segments=Nobody").await;
    assert_eq!(empty["data"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_refresh_and_health() {
    let base = start_server().await;

    let (_, health) = get(&base, "/api/health").await;
    assert_eq!(health["status"], "healthy");
    assert!(health["last_refresh"].is_null());

    let response = reqwest::Client::new()
        .post(format!("{}/api/sales/refresh", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let refreshed = body["last_refresh"].as_str().unwrap().to_string();

    let (_, health) = get(&base, "/api/health").await;
    assert_eq!(health["last_refresh"], refreshed);
}

#[tokio::test]
async fn test_client_errors() {
    let base = start_server().await;

    let (status, body) = get(&base, "/api/sales/overview?end_date=2023-13-40").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_request");
    assert!(body["detail"].as_str().unwrap().contains("end_date"));

    let (status, _) = get(&base, "/api/unknown").await;
    assert_eq!(status, 404);
}
