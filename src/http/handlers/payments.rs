use crate::domain::payment::{err, IntakePaymentRequest};
use crate::domain::summary::SummaryRange;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<IntakePaymentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(
                    err("MALFORMED_BODY", "request body is not a valid payment")
                        .with_details(rejection.body_text()),
                ),
            )
                .into_response()
        }
    };

    match req.validate() {
        Ok(payment) => {
            state
                .dispatcher
                .dispatch(payment.correlation_id, payment.amount);
            axum::http::StatusCode::ACCEPTED.into_response()
        }
        Err(e) => (
            axum::http::StatusCode::BAD_REQUEST,
            Json(err(e.code, e.message)),
        )
            .into_response(),
    }
}

pub async fn payments_summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryRange>, QueryRejection>,
) -> impl IntoResponse {
    let Query(range) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(
                    err("INVALID_RANGE", "from and to must be ISO-8601 timestamps")
                        .with_details(rejection.body_text()),
                ),
            )
                .into_response()
        }
    };

    match state.payment_store.summarize(&range).await {
        Ok(summary) => (axum::http::StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!("payments summary failed: {:#}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("INTERNAL_ERROR", "payments summary unavailable")),
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
