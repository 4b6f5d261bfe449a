use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use catalog_cell::router::catalog_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::router::payment_routes;
use shared_utils::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic portal API is running!" }))
        .merge(catalog_routes(state.clone()))
        .merge(booking_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(payment_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;
    use shared_utils::test_utils::TestConfig;

    #[tokio::test]
    async fn test_liveness() {
        let app = create_router(TestConfig::default().to_app_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Clinic portal API is running!");
    }

    #[tokio::test]
    async fn test_cell_routes_are_mounted() {
        let app = create_router(TestConfig::default().to_app_state());

        // Protected routes from every cell answer 401 rather than 404
        for (method, uri) in [
            ("GET", "/booking?email=a@x.com"),
            ("GET", "/users"),
            ("GET", "/doctors"),
            ("GET", "/admin/a@x.com"),
            ("POST", "/create-payment-intent"),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }
}
