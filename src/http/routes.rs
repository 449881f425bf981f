use crate::http::handlers::{ops, payments, processors_health};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(payments::health))
        .route("/payments", post(payments::create_payment))
        .route("/payments-summary", get(payments::payments_summary))
        .route("/processors/health", get(processors_health::status))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
