use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use doctor_cell::router::doctor_routes;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap_or(Value::Null) };
    (status, json)
}

async fn mount_user(mock_server: &MockServer, email: &str, role: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", format!("eq.{}", email)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_response(email, role)
        ])))
        .mount(mock_server)
        .await;
}

fn post_doctor(caller: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/doctors")
        .header("Authorization", JwtTestUtils::bearer(caller))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn doctor_body() -> Value {
    json!({
        "name": "Dr. Who",
        "email": "who@clinic.com",
        "specialty": "Orthodontics"
    })
}

#[tokio::test]
async fn test_list_doctors_as_admin() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "root@x.com", "Admin").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(1, "who@clinic.com", "Dr. Who", "Orthodontics")
        ])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let request = Request::builder()
        .method("GET")
        .uri("/doctors")
        .header("Authorization", JwtTestUtils::bearer("root@x.com"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(doctor_routes(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "who@clinic.com");
    assert_eq!(body[0]["specialty"], "Orthodontics");
}

#[tokio::test]
async fn test_doctor_routes_reject_patients() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "p@x.com", "Patient").await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();

    let (status, _) = send(doctor_routes(state), post_doctor("p@x.com", doctor_body())).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_doctor_routes_require_credential() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();

    let request = Request::builder()
        .method("GET")
        .uri("/doctors")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(doctor_routes(state), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_doctor() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "root@x.com", "Admin").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(body_partial_json(json!({ "email": "who@clinic.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::doctor_response(7, "who@clinic.com", "Dr. Who", "Orthodontics")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();

    let (status, body) = send(doctor_routes(state), post_doctor("root@x.com", doctor_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    assert_eq!(body["name"], "Dr. Who");
}

#[tokio::test]
async fn test_create_duplicate_doctor_conflicts() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "root@x.com", "Admin").await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("duplicate key value violates unique constraint", "23505")
        ))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();

    let (status, body) = send(doctor_routes(state), post_doctor("root@x.com", doctor_body())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("who@clinic.com"));
}

#[tokio::test]
async fn test_create_doctor_with_invalid_email() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "root@x.com", "Admin").await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let body = json!({ "name": "Dr. Who", "email": "who", "specialty": "Orthodontics" });

    let (status, _) = send(doctor_routes(state), post_doctor("root@x.com", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_doctor() {
    let mock_server = MockServer::start().await;
    mount_user(&mock_server, "root@x.com", "Admin").await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("email", "eq.who@clinic.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(7, "who@clinic.com", "Dr. Who", "Orthodontics")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_supabase(&mock_server.uri()).to_app_state();
    let request = Request::builder()
        .method("DELETE")
        .uri("/doctor/who@clinic.com")
        .header("Authorization", JwtTestUtils::bearer("root@x.com"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(doctor_routes(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
}
