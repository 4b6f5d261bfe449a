use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use catalog_cell::router::catalog_routes;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn mount_catalog(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::service_response(1, "Cleaning", &["9am", "10am"]),
            MockSupabaseResponses::service_response(2, "Filling", &["9am", "10am", "11am"])
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_available_removes_booked_slots() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("date", "eq.2024-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_response(&Uuid::new_v4().to_string(), "a@x.com", "Cleaning", "2024-01-01", "9am")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let (status, body) = get(catalog_routes(state), "/available?date=2024-01-01").await;

    assert_eq!(status, StatusCode::OK);
    let views = body.as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["name"], "Cleaning");
    assert_eq!(views[0]["slots"], json!(["10am"]));
    assert_eq!(views[0]["booked"], json!(["9am"]));
    assert_eq!(views[1]["name"], "Filling");
    assert_eq!(views[1]["slots"], json!(["9am", "10am", "11am"]));
    assert_eq!(views[1]["booked"], json!([]));
}

#[tokio::test]
async fn test_available_rejects_malformed_date() {
    let state = TestConfig::default().to_app_state();
    let (status, _) = get(catalog_routes(state), "/available?date=January%201").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_store_failure_is_server_error() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let (status, body) = get(catalog_routes(state), "/available?date=2024-01-01").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_services_names_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .and(query_param("select", "id,name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Cleaning" },
            { "id": 2, "name": "Filling" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let (status, body) = get(catalog_routes(state), "/services").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([
        { "id": 1, "name": "Cleaning" },
        { "id": 2, "name": "Filling" }
    ]));
}

#[tokio::test]
async fn test_list_services_full() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let (status, body) = get(catalog_routes(state), "/services/all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["slots"], json!(["9am", "10am", "11am"]));
}
