use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use tracing::warn;

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;
use crate::services::StripeClient;

pub struct PaymentState {
    pub app: Arc<AppState>,
    /// `None` when no processor key is configured; intent requests then fail
    /// with a 502.
    pub stripe: Option<StripeClient>,
}

pub fn payment_routes(state: Arc<AppState>) -> Router {
    let stripe = match StripeClient::new(&state.config) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Payment intents unavailable: {}", e);
            None
        }
    };

    let payment_state = Arc::new(PaymentState {
        app: state.clone(),
        stripe,
    });

    Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/payment/{id}", get(handlers::get_payment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .with_state(payment_state)
}
