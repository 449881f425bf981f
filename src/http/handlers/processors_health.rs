use crate::domain::payment::{err, Processor};
use crate::health::HealthStateStore;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProcessorHealthView {
    pub failing: bool,
    #[serde(rename = "probeLocked")]
    pub probe_locked: bool,
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    match snapshot(state.health_store.as_ref()).await {
        Ok(view) => (axum::http::StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            tracing::error!("health snapshot failed: {:#}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("INTERNAL_ERROR", "health state unavailable")),
            )
                .into_response()
        }
    }
}

pub async fn snapshot(
    store: &dyn HealthStateStore,
) -> anyhow::Result<BTreeMap<&'static str, ProcessorHealthView>> {
    let mut out = BTreeMap::new();
    for processor in Processor::ALL {
        out.insert(
            processor.as_str(),
            ProcessorHealthView {
                failing: store.is_failing(processor).await?,
                probe_locked: store.is_probe_locked(processor).await?,
            },
        );
    }
    Ok(out)
}
