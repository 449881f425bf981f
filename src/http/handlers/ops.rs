use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let payment_store_ok = match state.payment_store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("payment store not ready: {:#}", e);
            false
        }
    };
    let health_store_ok = match state.health_store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("health store not ready: {:#}", e);
            false
        }
    };

    let ok = payment_store_ok && health_store_ok;
    let status = if ok {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "ready": ok,
            "payment_store": payment_store_ok,
            "health_store": health_store_ok
        })),
    )
        .into_response()
}

pub async fn liveness() -> impl IntoResponse {
    (axum::http::StatusCode::OK, Json(serde_json::json!({"alive": true}))).into_response()
}
